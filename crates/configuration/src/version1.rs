//! Reading and writing the on-disk configuration.

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs;

use crate::configuration::{CompilerSettings, CURRENT_VERSION};
use crate::error::{ParseConfigurationError, WriteConfigurationError};

pub const CONFIGURATION_FILENAME: &str = "configuration.json";
pub const CONFIGURATION_JSONSCHEMA_FILENAME: &str = "schema.json";

/// Read the settings from `configuration.json` in the given directory.
/// A directory without that file yields the default settings.
pub async fn parse_configuration(
    configuration_dir: impl AsRef<Path>,
) -> Result<CompilerSettings, ParseConfigurationError> {
    let configuration_file = configuration_dir.as_ref().join(CONFIGURATION_FILENAME);

    let configuration_file_contents = match fs::read_to_string(&configuration_file).await {
        Ok(contents) => contents,
        Err(err) if err.kind() == ErrorKind::NotFound => {
            tracing::debug!(
                path = %configuration_file.display(),
                "no configuration file, using defaults"
            );
            return Ok(CompilerSettings::default());
        }
        Err(err) => {
            return Err(ParseConfigurationError::IoErrorButStringified(format!(
                "{}: {}",
                &configuration_file.display(),
                err
            )))
        }
    };

    let settings: CompilerSettings = serde_json::from_str(&configuration_file_contents)
        .map_err(|error| ParseConfigurationError::ParseError {
            file_path: configuration_file.clone(),
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        })?;

    validate(&settings)?;
    Ok(settings)
}

fn validate(settings: &CompilerSettings) -> Result<(), ParseConfigurationError> {
    if settings.version != CURRENT_VERSION {
        return Err(ParseConfigurationError::UnsupportedVersion(settings.version));
    }
    if settings.primary_key.trim().is_empty() {
        return Err(ParseConfigurationError::InvalidValue {
            field: "primaryKey".to_string(),
            message: "must not be empty".to_string(),
        });
    }
    if settings.max_predicate_depth == 0 {
        return Err(ParseConfigurationError::InvalidValue {
            field: "maxPredicateDepth".to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

/// Write the settings and their JSON schema into a directory, creating it if needed.
pub async fn write_configuration(
    settings: &CompilerSettings,
    out_dir: impl AsRef<Path>,
) -> Result<(), WriteConfigurationError> {
    let configuration_file = out_dir.as_ref().to_owned().join(CONFIGURATION_FILENAME);
    fs::create_dir_all(out_dir.as_ref()).await?;

    // create the configuration file
    fs::write(
        configuration_file,
        serde_json::to_string_pretty(settings)? + "\n",
    )
    .await?;

    // create the jsonschema file
    let configuration_jsonschema_file_path = out_dir
        .as_ref()
        .to_owned()
        .join(CONFIGURATION_JSONSCHEMA_FILENAME);

    fs::write(
        &configuration_jsonschema_file_path,
        serde_json::to_string_pretty(&configuration_schema())? + "\n",
    )
    .await?;

    Ok(())
}

/// The JSON schema of the configuration file.
pub fn configuration_schema() -> schemars::schema::RootSchema {
    schemars::schema_for!(CompilerSettings)
}
