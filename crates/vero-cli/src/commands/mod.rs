pub mod compliance;
pub mod reconcile;
pub mod reference;
pub mod tax;

use serde::de::DeserializeOwned;

use crate::input;

/// JSON from `--input <file>` or piped stdin, if either was given.
pub(crate) fn read_input_opt<T: DeserializeOwned>(
    path: Option<&str>,
) -> Result<Option<T>, Box<dyn std::error::Error>> {
    if let Some(path) = path {
        Ok(Some(input::file::read_json(path)?))
    } else if let Some(data) = input::stdin::read_stdin()? {
        Ok(Some(serde_json::from_value(data)?))
    } else {
        Ok(None)
    }
}

/// Like [`read_input_opt`] for commands that have no flag-based input.
pub(crate) fn read_input<T: DeserializeOwned>(
    path: Option<&str>,
    what: &str,
) -> Result<T, Box<dyn std::error::Error>> {
    read_input_opt(path)?
        .ok_or_else(|| format!("--input <file.json> or stdin required for {what}").into())
}
