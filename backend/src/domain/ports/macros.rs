//! `define_port_error!` generates port error enums with snake_case constructors.

macro_rules! define_port_error {
    (@ctor $variant:ident) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]() -> Self {
                Self::$variant
            }
        }
    };

    (@ctor $variant:ident { $($field:ident : $ty:ty),* $(,)? }) => {
        define_port_error!(@ctor_impl $variant () () $( $field : $ty, )*);
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) ) => {
        ::paste::paste! {
            pub fn [<$variant:snake>]($($params)*) -> Self {
                Self::$variant { $($inits)* }
            }
        }
    };

    (@ctor_impl $variant:ident ($($params:tt)*) ($($inits:tt)*) $field:ident : $ty:ty, $($rest:tt)*) => {
        define_port_error!(
            @ctor_impl
            $variant
            ($($params)* $field: impl Into<$ty>,)
            ($($inits)* $field: $field.into(),)
            $($rest)*
        );
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
        }
    };
}

pub(crate) use define_port_error;

#[cfg(test)]
mod tests {
    //! Regression coverage for the port error macro.
    use rstest::rstest;

    use crate::domain::ports::{FallbackSessionStoreError, UpstreamHttpError};

    define_port_error! {
        pub enum FixtureError {
            Status { status: u16 } => "fixture returned {status}",
            Rejected { message: String, status: u16 } => "fixture rejected: {message} ({status})",
            Empty => "fixture returned nothing",
        }
    }

    #[rstest]
    #[case(UpstreamHttpError::timeout("20s"), "upstream request timed out: 20s")]
    #[case(UpstreamHttpError::transport("refused"), "upstream transport failed: refused")]
    #[case(
        UpstreamHttpError::invalid_request("bad header"),
        "upstream request invalid: bad header"
    )]
    fn upstream_constructors_accept_str(#[case] err: UpstreamHttpError, #[case] expected: &str) {
        assert_eq!(err.to_string(), expected);
    }

    #[rstest]
    fn store_constructors_fill_the_named_variant() {
        let err = FallbackSessionStoreError::connection("database offline");
        assert_eq!(
            err,
            FallbackSessionStoreError::Connection {
                message: "database offline".to_owned()
            }
        );
        assert_eq!(
            FallbackSessionStoreError::query("check violation").to_string(),
            "fallback session store query failed: check violation"
        );
    }

    #[rstest]
    fn constructors_preserve_non_string_types() {
        assert_eq!(FixtureError::status(503_u16).to_string(), "fixture returned 503");
        assert_eq!(
            FixtureError::rejected("bad token", 401_u16).to_string(),
            "fixture rejected: bad token (401)"
        );
    }

    #[rstest]
    fn unit_variants_get_constructors() {
        assert_eq!(FixtureError::empty(), FixtureError::Empty);
    }
}
