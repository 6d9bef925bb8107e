//! `define_port_error!` declares a repository error enum together with one
//! snake_case constructor per variant.
//!
//! Every variant is written with a brace group (which may be empty) and a
//! display format:
//!
//! ```ignore
//! define_port_error! {
//!     pub enum TagRepositoryError {
//!         Connection { message: String } => "tag store unreachable: {message}",
//!     }
//! }
//! let err = TagRepositoryError::connection("refused");
//! ```
//!
//! Constructor parameters take `impl Into<FieldType>` so adapters can pass
//! `&str` or a formatted `String` interchangeably.

macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident { $($field:ident : $ty:ty),* $(,)? } => $message:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($message)]
                $variant { $($field: $ty),* },
            )+
        }

        ::paste::paste! {
            impl $name {
                $(
                    #[doc = concat!("Build [`", stringify!($name), "::", stringify!($variant), "`].")]
                    pub fn [<$variant:snake>]($($field: impl Into<$ty>),*) -> Self {
                        Self::$variant { $($field: $field.into()),* }
                    }
                )+
            }
        }
    };
}

pub(crate) use define_port_error;
