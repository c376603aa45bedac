use std::path::Path;

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;

use crate::similarity::ScoreWeights;

const BUILTIN_DEFAULT: &str = "default";

/// Named set of scoring weights, loaded from a JSON or TOML file.
///
/// ```toml
/// schema_version = 1
/// name = "names-first"
///
/// [weights]
/// name = 60.0
/// char_overlap = 5.0
/// ```
///
/// Weights left out keep their default value.
#[derive(Clone, Debug, PartialEq)]
pub struct ScoringProfile {
    name: String,
    description: Option<String>,
    weights: ScoreWeights,
}

#[derive(Debug, Default, Deserialize)]
struct RawProfile {
    schema_version: Option<u32>,
    name: Option<String>,
    description: Option<String>,
    weights: Option<ScoreWeights>,
}

impl Default for ScoringProfile {
    fn default() -> Self {
        Self {
            name: BUILTIN_DEFAULT.to_string(),
            description: None,
            weights: ScoreWeights::DEFAULT,
        }
    }
}

impl ScoringProfile {
    #[must_use]
    pub fn builtin(name: &str) -> Option<Self> {
        match name {
            BUILTIN_DEFAULT => Some(Self::default()),
            _ => None,
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        let fallback = path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .unwrap_or("custom");
        Self::from_bytes(fallback, &bytes)
    }

    pub fn from_bytes(profile_name: &str, bytes: &[u8]) -> Result<Self> {
        let raw = parse_raw(bytes).with_context(|| {
            format!("Profile '{profile_name}' is not valid JSON/TOML configuration")
        })?;
        Self::from_raw(raw, profile_name)
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    #[must_use]
    pub const fn weights(&self) -> &ScoreWeights {
        &self.weights
    }

    fn from_raw(raw: RawProfile, fallback_name: &str) -> Result<Self> {
        if let Some(schema_version) = raw.schema_version {
            if schema_version != 1 {
                return Err(anyhow!(
                    "profile.schema_version {schema_version} is not supported (expected 1)"
                ));
            }
        }

        let name = raw
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| fallback_name.to_string());
        let weights = raw.weights.unwrap_or_default();
        validate_weights(&weights)
            .with_context(|| format!("Invalid weights for profile '{name}'"))?;

        Ok(Self {
            name,
            description: raw.description,
            weights,
        })
    }
}

fn validate_weights(weights: &ScoreWeights) -> Result<()> {
    for (field, value) in weights.fields() {
        if !value.is_finite() || value < 0.0 {
            return Err(anyhow!(
                "weights.{field} must be a finite, non-negative number (got {value})"
            ));
        }
    }
    if weights.fuzzy_token_threshold > 1.0 {
        return Err(anyhow!(
            "weights.fuzzy_token_threshold must be within [0, 1] (got {})",
            weights.fuzzy_token_threshold
        ));
    }
    Ok(())
}

fn parse_raw(bytes: &[u8]) -> Result<RawProfile> {
    let value: serde_json::Value = match serde_json::from_slice(bytes) {
        Ok(value) => value,
        Err(json_err) => {
            let utf8 = std::str::from_utf8(bytes).map_err(|err| anyhow!("{json_err}; {err}"))?;
            let toml_value: toml::Value = toml::from_str(utf8).map_err(|toml_err| {
                anyhow!(
                    "Profile is not valid JSON or TOML ({json_err}); TOML parse error: {toml_err}"
                )
            })?;
            serde_json::to_value(toml_value)
                .map_err(|err| anyhow!("Failed to convert TOML profile to JSON: {err}"))?
        }
    };

    validate_profile_value(&value)?;
    serde_json::from_value(value).map_err(|err| anyhow!("Profile parse error: {err}"))
}

fn validate_profile_value(value: &serde_json::Value) -> Result<()> {
    fn validate_object_keys(
        unknown: &mut Vec<String>,
        obj: &serde_json::Map<String, serde_json::Value>,
        base: &str,
        allowed: &[&str],
    ) {
        for key in obj.keys() {
            if !allowed.iter().any(|a| a == &key.as_str()) {
                if base.is_empty() {
                    unknown.push(key.to_string());
                } else {
                    unknown.push(format!("{base}.{key}"));
                }
            }
        }
    }

    let serde_json::Value::Object(root) = value else {
        return Err(anyhow!("Profile config must be a JSON object"));
    };

    let mut unknown = Vec::new();
    validate_object_keys(
        &mut unknown,
        root,
        "",
        &["schema_version", "name", "description", "weights"],
    );

    match root.get("weights") {
        None => {}
        Some(serde_json::Value::Object(weights)) => {
            let allowed: Vec<&str> = ScoreWeights::DEFAULT
                .fields()
                .iter()
                .map(|(field, _)| *field)
                .collect();
            validate_object_keys(&mut unknown, weights, "weights", &allowed);
        }
        Some(_) => return Err(anyhow!("weights must be a table")),
    }

    if unknown.is_empty() {
        Ok(())
    } else {
        unknown.sort();
        Err(anyhow!("Unknown profile fields: {}", unknown.join(", ")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Write;

    #[test]
    fn builtin_default_uses_default_weights() {
        let profile = ScoringProfile::builtin("default").unwrap();
        assert_eq!(profile.name(), "default");
        assert_eq!(profile.weights(), &ScoreWeights::DEFAULT);
        assert!(ScoringProfile::builtin("nope").is_none());
    }

    #[test]
    fn toml_weights_override_only_named_fields() {
        let profile = ScoringProfile::from_bytes(
            "custom",
            br#"
            schema_version = 1
            name = "names-first"
            description = "Lean on the name channel"

            [weights]
            name = 60.0
            char_overlap = 5.0
            "#,
        )
        .unwrap();

        assert_eq!(profile.name(), "names-first");
        assert_eq!(profile.description(), Some("Lean on the name channel"));
        assert_eq!(profile.weights().name, 60.0);
        assert_eq!(profile.weights().char_overlap, 5.0);
        assert_eq!(profile.weights().exact_name_bonus, ScoreWeights::DEFAULT.exact_name_bonus);
        assert_eq!(profile.weights().max_score, 100.0);
    }

    #[test]
    fn json_profiles_are_accepted() {
        let profile =
            ScoringProfile::from_bytes("custom", br#"{"weights": {"token_hit": 8}}"#).unwrap();
        assert_eq!(profile.name(), "custom");
        assert_eq!(profile.weights().token_hit, 8.0);
    }

    #[test]
    fn unknown_fields_are_reported_with_their_path() {
        let err = ScoringProfile::from_bytes(
            "custom",
            br#"
            colour = "red"

            [weights]
            nmae = 50.0
            "#,
        )
        .unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("colour"), "{msg}");
        assert!(msg.contains("weights.nmae"), "{msg}");
    }

    #[test]
    fn profile_rejects_unsupported_schema_version() {
        let err = ScoringProfile::from_bytes("custom", br#"{ "schema_version": 2 }"#).unwrap_err();
        let msg = format!("{err:#}");
        assert!(msg.contains("profile.schema_version"), "{msg}");
    }

    #[test]
    fn negative_or_out_of_range_weights_are_rejected() {
        let err = ScoringProfile::from_bytes("custom", b"[weights]\nname = -1.0\n").unwrap_err();
        assert!(format!("{err:#}").contains("weights.name"));

        let err = ScoringProfile::from_bytes("custom", b"[weights]\nfuzzy_token_threshold = 1.5\n")
            .unwrap_err();
        assert!(format!("{err:#}").contains("fuzzy_token_threshold"));
    }

    #[test]
    fn from_file_falls_back_to_file_stem() {
        let mut file = tempfile::Builder::new()
            .prefix("strict")
            .suffix(".toml")
            .tempfile()
            .unwrap();
        writeln!(file, "[weights]\nsubstring_bonus = 0.0").unwrap();

        let profile = ScoringProfile::from_file(file.path()).unwrap();
        assert!(profile.name().starts_with("strict"));
        assert_eq!(profile.weights().substring_bonus, 0.0);
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = ScoringProfile::from_file(Path::new("/nonexistent/profile.toml")).unwrap_err();
        assert!(format!("{err:#}").contains("Failed to read profile file"));
    }
}
