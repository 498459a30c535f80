//! Scene layouts
//!
//! A [`SceneLayout`] lists the bodies a scene starts with. Layouts are
//! loaded from and saved to RON files, so the slice demo can be populated
//! without recompiling.

use demo2d_math::{Polygon, PolygonError, Vec2};
use demo2d_physics::{BodyKey, BodyType, PhysicsMaterial, PhysicsWorld, RigidBody2D, Shape};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::Path;

/// Serializable shape description, in body-local metres
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum ShapeTemplate {
    Circle {
        radius: f32,
    },
    /// Box centered on the body origin
    Box {
        half_width: f32,
        half_height: f32,
    },
    /// Convex polygon; winding is fixed up on creation
    Polygon {
        vertices: Vec<Vec2>,
    },
}

impl ShapeTemplate {
    /// Create the collision shape from this template
    ///
    /// Radii and half extents must be positive.
    pub fn create_shape(&self) -> Result<Shape, LayoutError> {
        match *self {
            ShapeTemplate::Circle { radius } => Ok(Shape::circle(positive(radius)?)),
            ShapeTemplate::Box {
                half_width,
                half_height,
            } => Ok(Shape::rect(positive(half_width)?, positive(half_height)?)),
            ShapeTemplate::Polygon { ref vertices } => {
                Ok(Shape::Polygon(Polygon::new(vertices.clone())?))
            }
        }
    }
}

fn positive(size: f32) -> Result<f32, LayoutError> {
    if size > 0.0 && size.is_finite() {
        Ok(size)
    } else {
        Err(LayoutError::InvalidSize(size))
    }
}

fn default_body_type() -> BodyType {
    BodyType::Dynamic
}

/// Serializable body description
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BodyTemplate {
    /// Optional name (for debugging)
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default = "default_body_type")]
    pub body_type: BodyType,
    /// Body origin in world metres
    pub position: Vec2,
    /// Rotation in radians
    #[serde(default)]
    pub angle: f32,
    pub shape: ShapeTemplate,
    #[serde(default)]
    pub material: PhysicsMaterial,
    /// User tag; `Some(0)` makes ray casts ignore the body
    #[serde(default)]
    pub tag: Option<i32>,
}

impl BodyTemplate {
    /// Dynamic body template
    pub fn new(shape: ShapeTemplate, position: Vec2) -> Self {
        Self {
            name: None,
            body_type: BodyType::Dynamic,
            position,
            angle: 0.0,
            shape,
            material: PhysicsMaterial::default(),
            tag: None,
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_body_type(mut self, body_type: BodyType) -> Self {
        self.body_type = body_type;
        self
    }

    pub fn with_angle(mut self, angle: f32) -> Self {
        self.angle = angle;
        self
    }

    pub fn with_material(mut self, material: PhysicsMaterial) -> Self {
        self.material = material;
        self
    }

    pub fn with_tag(mut self, tag: i32) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Convert this template into a rigid body
    pub fn to_body(&self) -> Result<RigidBody2D, LayoutError> {
        let shape = self.shape.create_shape()?;
        let mut body = RigidBody2D::new(self.body_type, self.position)
            .with_angle(self.angle)
            .with_fixture(shape, self.material);
        body.set_user_tag(self.tag);
        Ok(body)
    }
}

/// A serializable list of bodies to populate a scene with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SceneLayout {
    /// Layout name (for display/debugging)
    pub name: String,
    /// Gravity override (m/s²)
    #[serde(default)]
    pub gravity: Option<Vec2>,
    pub bodies: Vec<BodyTemplate>,
}

impl SceneLayout {
    /// Create a new empty layout
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            gravity: None,
            bodies: Vec::new(),
        }
    }

    /// Set the gravity for this layout
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = Some(gravity);
        self
    }

    /// Add a body template to this layout
    pub fn add_body(&mut self, body: BodyTemplate) {
        self.bodies.push(body);
    }

    /// Load a layout from a RON file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let contents = fs::read_to_string(path)?;
        Self::from_ron(&contents)
    }

    /// Parse a layout from RON text
    pub fn from_ron(contents: &str) -> Result<Self, LayoutError> {
        Ok(ron::from_str(contents)?)
    }

    /// Serialize to pretty RON text
    pub fn to_ron(&self) -> Result<String, LayoutError> {
        let pretty = ron::ser::PrettyConfig::new()
            .struct_names(true)
            .enumerate_arrays(false);
        Ok(ron::ser::to_string_pretty(self, pretty)?)
    }

    /// Save the layout to a RON file
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), LayoutError> {
        fs::write(path, self.to_ron()?)?;
        Ok(())
    }

    /// Add every body of the layout to `world`
    ///
    /// Applies the gravity override. Nothing is added if any template is
    /// invalid.
    pub fn spawn(&self, world: &mut PhysicsWorld) -> Result<Vec<BodyKey>, LayoutError> {
        let bodies = self
            .bodies
            .iter()
            .map(BodyTemplate::to_body)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(gravity) = self.gravity {
            world.config.gravity = gravity;
        }
        Ok(bodies.into_iter().map(|body| world.add_body(body)).collect())
    }
}

/// Error loading, saving or instantiating a layout
#[derive(Debug)]
pub enum LayoutError {
    /// IO error (file not found, permission denied, etc.)
    Io(io::Error),
    /// Parse error (invalid RON syntax)
    Parse(ron::error::SpannedError),
    /// Serialization error
    Serialize(ron::Error),
    /// A polygon template is not a valid convex polygon
    InvalidShape(PolygonError),
    /// A circle radius or box half extent is not positive
    InvalidSize(f32),
}

impl From<io::Error> for LayoutError {
    fn from(e: io::Error) -> Self {
        LayoutError::Io(e)
    }
}

impl From<ron::error::SpannedError> for LayoutError {
    fn from(e: ron::error::SpannedError) -> Self {
        LayoutError::Parse(e)
    }
}

impl From<ron::Error> for LayoutError {
    fn from(e: ron::Error) -> Self {
        LayoutError::Serialize(e)
    }
}

impl From<PolygonError> for LayoutError {
    fn from(e: PolygonError) -> Self {
        LayoutError::InvalidShape(e)
    }
}

impl std::fmt::Display for LayoutError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayoutError::Io(e) => write!(f, "IO error: {}", e),
            LayoutError::Parse(e) => write!(f, "Parse error: {}", e),
            LayoutError::Serialize(e) => write!(f, "Serialize error: {}", e),
            LayoutError::InvalidShape(e) => write!(f, "Invalid shape: {}", e),
            LayoutError::InvalidSize(size) => write!(f, "Invalid shape size: {}", size),
        }
    }
}

impl std::error::Error for LayoutError {}
