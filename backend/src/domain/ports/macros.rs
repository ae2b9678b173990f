//! `define_port_error!`: port error enums with constructors and stable kinds.
//!
//! Each variant `Foo { a: A }` gets a `foo(a: impl Into<A>)` constructor, and
//! the enum gets a `kind()` returning the snake-case variant name for use as
//! a structured log field.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            #[allow(dead_code)]
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                Self::$variant { $($field: $field.into()),* }
            }
        }
    };

    (@kind $variant:ident) => {
        ::paste::paste! { stringify!([<$variant:snake>]) }
    };

    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $($field:ident : $ty:ty),* $(,)? } )? => $message:expr
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant $( { $($field : $ty),* } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $($field : $ty),* } )?);
            )*

            /// Snake-case name of the variant.
            #[must_use]
            pub fn kind(&self) -> &'static str {
                match self {
                    $(
                        Self::$variant { .. } => define_port_error!(@kind $variant),
                    )*
                }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use crate::domain::CustomerId;

    define_port_error! {
        pub enum SamplePortError {
            Offline => "store offline",
            Rejected { id: CustomerId } => "rejected {id}",
            Failed { message: String, attempts: u32 } => "failed after {attempts}: {message}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SamplePortError::offline(), SamplePortError::Offline);
        assert_eq!(SamplePortError::offline().to_string(), "store offline");
    }

    #[test]
    fn constructors_accept_domain_types() {
        let id = CustomerId::generate();
        let err = SamplePortError::rejected(id);
        assert_eq!(err.to_string(), format!("rejected {id}"));
    }

    #[test]
    fn kind_names_the_variant_in_snake_case() {
        assert_eq!(SamplePortError::offline().kind(), "offline");
        assert_eq!(
            SamplePortError::rejected(CustomerId::generate()).kind(),
            "rejected"
        );
        assert_eq!(SamplePortError::failed("x", 1_u32).kind(), "failed");
    }

    #[test]
    fn constructors_convert_into_field_types() {
        let err = SamplePortError::failed("timeout", 3_u32);
        assert_eq!(err.to_string(), "failed after 3: timeout");
    }
}
