//! Data model for Mindscape server responses.
//!
//! A successful upload returns a `Palace`: the structured learning content
//! generated for one document. The wire format is JSON with snake_case field
//! names; all types here decode straight off the wire and are immutable after
//! decoding.

use serde::{Deserialize, Serialize};

/// Learning content generated for one uploaded document.
///
/// Constructed once per successful upload response. Concept ids are unique
/// within a palace and `learning_path` entries reference concept ids; both
/// properties are server-trusted and not enforced on decode.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Palace {
    pub title: String,
    pub environment_theme: EnvironmentTheme,
    #[serde(default)]
    pub environment_config: Option<EnvironmentConfig>,
    pub concepts: Vec<Concept>,
    #[serde(default)]
    pub learning_path: Vec<String>,
    #[serde(default)]
    pub music_session_id: Option<String>,
}

impl Palace {
    /// Look up a concept by id.
    pub fn concept(&self, id: &str) -> Option<&Concept> {
        self.concepts.iter().find(|c| c.id == id)
    }

    /// Concepts in learning-path order.
    ///
    /// Dangling path entries are skipped (the path is server-trusted, not
    /// validated). An empty path falls back to declaration order.
    pub fn learning_order(&self) -> Vec<&Concept> {
        if self.learning_path.is_empty() {
            return self.concepts.iter().collect();
        }
        self.learning_path
            .iter()
            .filter_map(|id| self.concept(id))
            .collect()
    }
}

/// Theme classification for the palace environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentTheme {
    pub theme: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub rationale: Option<String>,
    /// Classifier confidence in 0..=1.
    #[serde(default)]
    pub confidence: Option<f64>,
}

/// Concrete scene configuration for rendering the environment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentConfig {
    pub theme: String,
    #[serde(default)]
    pub theme_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    /// Floor texture URL.
    #[serde(default)]
    pub floor_texture: Option<String>,
    /// Skybox texture URL.
    #[serde(default)]
    pub skybox: Option<String>,
    #[serde(default)]
    pub objects: Option<Vec<EnvironmentObject>>,
}

/// One learning unit inside a palace.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Concept {
    /// Unique within the palace.
    pub id: String,
    pub name: String,
    pub description: String,
    pub mnemonic_prompt: String,
    pub audio_script: String,
    #[serde(default)]
    pub key_facts: Vec<String>,
    /// Ids of related concepts.
    #[serde(default)]
    pub connections: Vec<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub audio_url: Option<String>,
    /// World-space placement, if the server assigned one.
    #[serde(default)]
    pub position: Option<[f32; 3]>,
}

/// Primitive shape of a decorative environment object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ObjectShape {
    Box,
    Cylinder,
    Sphere,
    /// Shape this client does not know how to render. Skipped, never an error.
    #[serde(other)]
    Unknown,
}

/// A decorative scene element.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvironmentObject {
    #[serde(rename = "type")]
    pub shape: ObjectShape,
    #[serde(default)]
    pub name: Option<String>,
    pub position: [f32; 3],
    /// Euler rotation in radians.
    pub rotation: [f32; 3],
    /// Extents, required for box shapes.
    #[serde(default)]
    pub size: Option<[f32; 3]>,
    /// Required for cylinders and spheres.
    #[serde(default)]
    pub radius: Option<f32>,
    /// Required for cylinders.
    #[serde(default)]
    pub height: Option<f32>,
    #[serde(default)]
    pub texture_url: Option<String>,
}

impl EnvironmentObject {
    /// Whether the shape carries every parameter its type needs.
    ///
    /// Objects missing a required parameter are un-renderable; consumers
    /// should skip them rather than fail the whole scene.
    pub fn is_renderable(&self) -> bool {
        match self.shape {
            ObjectShape::Box => self.size.is_some(),
            ObjectShape::Cylinder => self.radius.is_some() && self.height.is_some(),
            ObjectShape::Sphere => self.radius.is_some(),
            ObjectShape::Unknown => false,
        }
    }
}
