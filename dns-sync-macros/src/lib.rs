#[macro_export]
/// The `extract_params!` macro pulls fields out of a loosely-typed builder (every field an
/// `Option<_>`) and produces a flat struct holding the resolved values.
///
/// - `required` fields fail with `"<key> is required"` when unset. The failure is a `String`,
///   so the enclosing function's error type must implement `From<String>`.
/// - `optional` fields fall back to the given default.
///
/// # Usage
///
/// ```rust,ignore
/// let params = extract_params!(builder, RecordParams, {
///     required domain: String => "zone",
///     required record_type: String => "rr",
///     optional subdomain: String = "" => "name",
///     optional ttl: u32 = 0 => "ttl"
/// });
/// ```
///
/// The generated struct derives `Debug` and `serde::Serialize`, keyed by the quoted names, so
/// it can be logged or echoed back as JSON.
macro_rules! extract_params {
    (@required $builder:expr, $field:ident, $key:literal) => {
        $builder
            .$field
            .clone()
            .ok_or_else(|| format!("{} is required", $key))?
    };

    (@optional $builder:expr, $field:ident, $default:expr) => {
        $builder.$field.clone().unwrap_or_else(|| $default.into())
    };

    (
        $builder:expr,
        $struct_name:ident,
        {
            $( required $req_field:ident : $req_ty:ty => $req_key:literal ),* $(,)*
            $( optional $opt_field:ident : $opt_ty:ty = $opt_default:expr => $opt_key:literal ),* $(,)*
        }
    ) => {{
        #[derive(Debug, serde::Serialize)]
        struct $struct_name {
            $(
                #[serde(rename = $req_key)]
                $req_field: $req_ty,
            )*
            $(
                #[serde(rename = $opt_key)]
                $opt_field: $opt_ty,
            )*
        }

        $struct_name {
            $(
                $req_field: $crate::extract_params!(@required $builder, $req_field, $req_key),
            )*
            $(
                $opt_field: $crate::extract_params!(@optional $builder, $opt_field, $opt_default),
            )*
        }
    }};
}
