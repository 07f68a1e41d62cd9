//! Macros for reducing boilerplate when defining record domains
//!
//! Each domain needs a status enum with its presentation table and a record
//! struct implementing [`Record`](crate::core::record::Record). These macros
//! generate both from a compact declaration.

/// Declare a closed status enum together with its badge lookup table
///
/// Each variant lists `(wire name, label, icon, badge variant)`. The macro
/// implements [`Status`](crate::core::status::Status), `Display`, `FromStr`
/// and serde using the wire name.
///
/// # Example
///
/// ```rust,ignore
/// status_enum!(
///     PlanStatus,
///     "plan status",
///     {
///         Draft => ("draft", "Draft", "file-pen", Outline),
///         Active => ("active", "Active", "check-circle", Success),
///     }
/// );
///
/// assert_eq!(PlanStatus::Draft.to_string(), "draft");
/// assert_eq!("active".parse::<PlanStatus>(), Ok(PlanStatus::Active));
/// ```
#[macro_export]
macro_rules! status_enum {
    (
        $type:ident,
        $kind:literal,
        {
            $( $variant:ident => ( $wire:literal, $label:literal, $icon:literal, $badge:ident ) ),+ $(,)?
        }
    ) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize,
        )]
        pub enum $type {
            $(
                #[serde(rename = $wire)]
                $variant,
            )+
        }

        impl $crate::core::status::Status for $type {
            fn all() -> &'static [Self] {
                &[ $( $type::$variant ),+ ]
            }

            fn as_str(&self) -> &'static str {
                match self {
                    $( $type::$variant => $wire, )+
                }
            }

            fn presentation(&self) -> $crate::core::status::StatusPresentation {
                match self {
                    $(
                        $type::$variant => $crate::core::status::StatusPresentation {
                            label: $label,
                            icon: $icon,
                            variant: $crate::core::status::BadgeVariant::$badge,
                        },
                    )+
                }
            }
        }

        impl ::std::fmt::Display for $type {
            fn fmt(&self, f: &mut ::std::fmt::Formatter<'_>) -> ::std::fmt::Result {
                f.write_str($crate::core::status::Status::as_str(self))
            }
        }

        impl ::std::str::FromStr for $type {
            type Err = $crate::core::status::ParseStatusError;

            fn from_str(s: &str) -> ::std::result::Result<Self, Self::Err> {
                <$type as $crate::core::status::Status>::parse(s).ok_or_else(|| {
                    $crate::core::status::ParseStatusError {
                        kind: $kind,
                        value: s.to_string(),
                    }
                })
            }
        }
    };
}

/// Complete macro to create a record type with automatic trait implementations
///
/// Injects `id`, `status`, `created_at` and `updated_at`, implements
/// [`Record`](crate::core::record::Record) and generates a `new` constructor
/// that stamps both timestamps with the current time.
///
/// `search` lists the fields free-text search looks at. Unknown names fail to
/// compile. Add `deletable: true` for domains whose records may be removed.
///
/// # Example
///
/// ```rust,ignore
/// impl_record!(
///     Patient,
///     "patient",
///     "patients",
///     PatientStatus,
///     search: [name, email],
///     {
///         name: String,
///         email: String,
///         coach_name: Option<String>,
///     }
/// );
///
/// let patient = Patient::new("p-1", PatientStatus::Onboarding, "Ana".into(), "ana@x.io".into(), None);
/// ```
#[macro_export]
macro_rules! impl_record {
    (
        $type:ident,
        $singular:literal,
        $plural:literal,
        $status:ty,
        search: [ $( $search_field:ident ),* $(,)? ],
        $( deletable: $deletable:literal, )?
        {
            $( $(#[$field_meta:meta])* $field:ident : $field_type:ty ),* $(,)?
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, ::serde::Serialize, ::serde::Deserialize)]
        pub struct $type {
            /// Identifier, unique within the collection
            pub id: String,

            /// Current workflow status
            pub status: $status,

            $(
                $(#[$field_meta])*
                pub $field : $field_type,
            )*

            /// When this record was created
            pub created_at: ::chrono::DateTime<::chrono::Utc>,

            /// When this record was last updated
            pub updated_at: ::chrono::DateTime<::chrono::Utc>,
        }

        impl $crate::core::record::Record for $type {
            type Status = $status;

            fn resource_name() -> &'static str {
                $plural
            }

            fn resource_name_singular() -> &'static str {
                $singular
            }

            fn id(&self) -> &str {
                &self.id
            }

            fn status(&self) -> $status {
                self.status
            }

            fn created_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.created_at
            }

            fn updated_at(&self) -> ::chrono::DateTime<::chrono::Utc> {
                self.updated_at
            }

            fn with_status(
                &self,
                status: $status,
                updated_at: ::chrono::DateTime<::chrono::Utc>,
            ) -> Self {
                Self {
                    status,
                    updated_at,
                    ..self.clone()
                }
            }

            fn searchable_fields() -> &'static [&'static str] {
                &[ $( stringify!($search_field) ),* ]
            }

            fn field_value(&self, field: &str) -> Option<$crate::core::field::FieldValue> {
                #[allow(unused_imports)]
                use $crate::core::field::IntoFieldValue;

                match field {
                    "id" => Some($crate::core::field::FieldValue::String(self.id.clone())),
                    "status" => Some($crate::core::field::FieldValue::String(
                        $crate::core::status::Status::as_str(&self.status).to_string(),
                    )),
                    "created_at" => Some($crate::core::field::FieldValue::DateTime(self.created_at)),
                    "updated_at" => Some($crate::core::field::FieldValue::DateTime(self.updated_at)),
                    $( stringify!($field) => Some(self.$field.to_field_value()), )*
                    _ => None,
                }
            }

            fn allows_delete() -> bool {
                false $( || $deletable )?
            }
        }

        impl $type {
            /// Create a new record with both timestamps set to now
            #[allow(clippy::too_many_arguments)]
            pub fn new(
                id: impl Into<String>,
                status: $status,
                $( $field: $field_type ),*
            ) -> Self {
                let now = ::chrono::Utc::now();
                Self {
                    id: id.into(),
                    status,
                    $( $field, )*
                    created_at: now,
                    updated_at: now,
                }
            }

            #[allow(dead_code)]
            fn __search_fields_exist(&self) {
                $( let _ = &self.$search_field; )*
            }
        }
    };
}
