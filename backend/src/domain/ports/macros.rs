//! `define_port_error!` generates port error enums with `thiserror` messages
//! and snake_case constructors whose arguments accept `impl Into<FieldType>`.

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
    //! Regression coverage for this module.
    define_port_error! {
        pub enum SampleStoreError {
            Unavailable => "store unavailable",
            Query { message: String } => "query failed: {message}",
            UserMissing { user_id: i64 } => "user {user_id} missing",
            MedicineMissing { user_id: i64, medicine_id: i64 } =>
                "medicine {medicine_id} missing for user {user_id}",
        }
    }

    #[test]
    fn unit_variants_get_nullary_constructors() {
        assert_eq!(SampleStoreError::unavailable(), SampleStoreError::Unavailable);
    }

    #[test]
    fn constructors_accept_str_for_string_fields() {
        let err = SampleStoreError::query("timeout");
        assert_eq!(err.to_string(), "query failed: timeout");
    }

    #[test]
    fn constructors_convert_into_field_types() {
        let err = SampleStoreError::user_missing(7_i32);
        assert_eq!(err.to_string(), "user 7 missing");
    }

    #[test]
    fn constructors_keep_field_order() {
        let err = SampleStoreError::medicine_missing(7_i64, 3_i64);
        assert_eq!(err.to_string(), "medicine 3 missing for user 7");
    }
}
