//! Helper macro generating domain port error enums.

/// Declare a `thiserror` enum for a persistence port with snake_case
/// constructors. Variants either carry a `message` (infrastructure failures)
/// or are unit markers (domain-meaningful outcomes such as a missing record).
macro_rules! define_port_error {
    (
        $(#[$outer:meta])*
        pub enum $name:ident {
            $(
                $(#[$variant_meta:meta])*
                $variant:ident $( { $field:ident: String } )? => $display:literal
            ),* $(,)?
        }
    ) => {
        $(#[$outer])*
        #[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
        pub enum $name {
            $(
                $(#[$variant_meta])*
                #[error($display)]
                $variant $( { $field: String } )?,
            )*
        }

        impl $name {
            $(
                define_port_error!(@ctor $variant $( { $field: String } )?);
            )*
        }
    };

    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { message: String }) => {
        ::paste::paste! {
            pub fn [<$variant:snake>](message: impl Into<String>) -> Self {
                Self::$variant { message: message.into() }
            }
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    define_port_error! {
        /// Example port error exercising both variant shapes.
        pub enum ExamplePortError {
            Query { message: String } => "query failed: {message}",
            Missing => "record missing",
        }
    }

    #[test]
    fn message_constructors_accept_str() {
        let err = ExamplePortError::query("boom");
        assert_eq!(err.to_string(), "query failed: boom");
    }

    #[test]
    fn unit_constructors_build_markers() {
        assert_eq!(ExamplePortError::missing(), ExamplePortError::Missing);
    }
}
