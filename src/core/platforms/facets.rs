// ─── Modrinth facet builder ───
//
// Facets are a JSON array of arrays: the outer level is AND, each inner
// array is OR. e.g. [["project_type:mod"],["categories:fabric","categories:quilt"]]

use serde_json::Value;

use super::model::AdvancedSearchOptions;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetBuilder {
    groups: Vec<Vec<String>>,
}

impl FacetBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one AND group whose members are OR'd. Blank values are dropped
    /// and an all-blank group is skipped.
    pub fn any_of<I, S>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let group: Vec<String> = values
            .into_iter()
            .map(|v| v.as_ref().trim().to_string())
            .filter(|v| !v.is_empty())
            .map(|v| format!("{key}:{v}"))
            .collect();
        if !group.is_empty() {
            self.groups.push(group);
        }
        self
    }

    pub fn project_types<I, S>(self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.any_of("project_type", types)
    }

    pub fn categories<I, S>(self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.any_of("categories", categories)
    }

    /// Loaders are stored as lower-case categories upstream.
    pub fn loaders<I, S>(self, loaders: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let lowered: Vec<String> = loaders
            .into_iter()
            .map(|l| l.as_ref().to_ascii_lowercase())
            .collect();
        self.any_of("categories", lowered)
    }

    pub fn game_versions<I, S>(self, versions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        self.any_of("versions", versions)
    }

    /// A single `key<op>value` facet as its own group, e.g. `downloads > 1000`.
    pub fn custom(mut self, key: &str, op: &str, value: &str) -> Self {
        let op = match op.trim() {
            "" | "=" | ":" => ":".to_string(),
            other => other.to_string(),
        };
        self.groups.push(vec![format!("{key}{op}{}", value.trim())]);
        self
    }

    pub fn from_options(options: &AdvancedSearchOptions) -> Self {
        let mut builder = Self::new()
            .project_types(&options.project_types)
            .categories(&options.categories)
            .game_versions(&options.game_versions)
            .loaders(&options.loaders);
        if options.client_side {
            builder = builder.any_of("client_side", ["required", "optional"]);
        }
        if options.server_side {
            builder = builder.any_of("server_side", ["required", "optional"]);
        }
        builder
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Serialized facet string, `None` when there is nothing to filter on.
    pub fn build(&self) -> Option<String> {
        if self.groups.is_empty() {
            return None;
        }
        let value = Value::Array(
            self.groups
                .iter()
                .map(|g| Value::Array(g.iter().cloned().map(Value::String).collect()))
                .collect(),
        );
        Some(value.to_string())
    }
}
