/// Declare a constant holding the name of an env variable.
#[macro_export]
macro_rules! env_var {
    ($name:ident) => {
        const $name: &'static str = stringify!($name);
    };
}

/// Load the env variable `$name`, falling back to `$default` when it is not
/// set, and pass it through the validating constructor `$type::new`.
///
/// The four-argument form parses the raw string into `$type_raw` first.
/// Requires `anyhow::Context` in scope and a function returning
/// `anyhow::Result`.
#[macro_export]
macro_rules! env_load {
    ($type:ident, $name:ident, $type_raw:ident, $default:expr) => {
        $type::new(
            std::env::var($name)
                .unwrap_or_else(|_| $default.to_string())
                .parse::<$type_raw>()
                .with_context(|| {
                    format!(
                        "{} env var cannot be parsed in the correct type",
                        $name
                    )
                })?,
        )
        .with_context(|| format!("{} was not formatted right", $name))?
    };
    ($type:ident, $name:ident, $default:expr) => {
        $type::new(
            std::env::var($name).unwrap_or_else(|_| $default.to_string()),
        )
        .with_context(|| format!("{} was not formatted right", $name))?
    };
}
