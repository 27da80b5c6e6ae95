use serde::Deserialize;
use time::OffsetDateTime;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Project {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

/// Validated input for a new project. Strings are already trimmed.
#[derive(Debug, Clone)]
pub struct CreateProject {
    pub title: String,
    pub description: String,
    pub image_url: Option<String>,
    pub project_url: Option<String>,
    pub github_url: Option<String>,
    pub technologies: Vec<String>,
}

/// Validated partial update.
///
/// `None` leaves a column untouched. For the URL columns `Some(None)` clears
/// the value.
#[derive(Debug, Clone, Default)]
pub struct UpdateProject {
    pub title: Option<String>,
    pub description: Option<String>,
    pub image_url: Option<Option<String>>,
    pub project_url: Option<Option<String>>,
    pub github_url: Option<Option<String>>,
    pub technologies: Option<Vec<String>>,
}

impl UpdateProject {
    /// Apply the supplied fields to `project`, leaving the rest as they are
    pub fn apply_to(&self, project: &mut Project) {
        if let Some(title) = &self.title {
            project.title = title.clone();
        }
        if let Some(description) = &self.description {
            project.description = description.clone();
        }
        if let Some(image_url) = &self.image_url {
            project.image_url = image_url.clone();
        }
        if let Some(project_url) = &self.project_url {
            project.project_url = project_url.clone();
        }
        if let Some(github_url) = &self.github_url {
            project.github_url = github_url.clone();
        }
        if let Some(technologies) = &self.technologies {
            project.technologies = technologies.clone();
        }
    }
}

/// A request field that distinguishes "absent" from "explicitly null".
///
/// Use with `#[serde(default)]` so a missing key deserializes as `Absent`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    /// Collapse to `Option`, treating absent and null alike
    pub fn into_option(self) -> Option<T> {
        match self {
            Patch::Value(value) => Some(value),
            Patch::Absent | Patch::Null => None,
        }
    }
}

impl<'de, T> Deserialize<'de> for Patch<T>
where
    T: Deserialize<'de>,
{
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        Ok(match Option::<T>::deserialize(deserializer)? {
            Some(value) => Patch::Value(value),
            None => Patch::Null,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[derive(Debug, Deserialize)]
    struct Payload {
        #[serde(default)]
        title: Patch<String>,
    }

    fn sample() -> Project {
        Project {
            id: 1,
            title: "Portfolio".to_string(),
            description: "Personal site".to_string(),
            image_url: Some("https://example.com/a.png".to_string()),
            project_url: None,
            github_url: Some("https://github.com/me/site".to_string()),
            technologies: vec!["Rust".to_string()],
            created_at: datetime!(2024-01-01 0:00 UTC),
            updated_at: datetime!(2024-01-01 0:00 UTC),
        }
    }

    #[test]
    fn test_patch_distinguishes_absent_null_and_value() {
        let absent: Payload = serde_json::from_str("{}").unwrap();
        assert_eq!(absent.title, Patch::Absent);

        let null: Payload = serde_json::from_str(r#"{"title": null}"#).unwrap();
        assert_eq!(null.title, Patch::Null);

        let value: Payload = serde_json::from_str(r#"{"title": "T"}"#).unwrap();
        assert_eq!(value.title, Patch::Value("T".to_string()));
    }

    #[test]
    fn test_apply_leaves_unspecified_fields() {
        let mut project = sample();
        let update = UpdateProject {
            title: Some("Renamed".to_string()),
            github_url: Some(None),
            ..Default::default()
        };

        update.apply_to(&mut project);

        assert_eq!(project.title, "Renamed");
        assert_eq!(project.description, "Personal site");
        assert_eq!(project.image_url.as_deref(), Some("https://example.com/a.png"));
        assert_eq!(project.github_url, None);
        assert_eq!(project.technologies, vec!["Rust".to_string()]);
    }
}
