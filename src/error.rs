use thiserror::Error;

/// Top-level error type for the floor-plan kernel.
#[derive(Debug, Error)]
pub enum PlanError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Document(#[from] DocumentError),

    #[error(transparent)]
    Import(#[from] ImportError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Errors related to grid and rectangle math.
#[derive(Debug, Error)]
pub enum GeometryError {
    #[error("invalid room size {width}x{height}: both dimensions must be positive")]
    InvalidDimensions { width: i32, height: i32 },

    #[error("invalid grid size {0}: must be positive and finite")]
    InvalidGridSize(f64),

    #[error("room at ({x}, {y}) sized {width}x{height} lies outside the grid")]
    OutOfBounds {
        x: i32,
        y: i32,
        width: i32,
        height: i32,
    },
}

/// Errors raised when a room or instance cannot be put where it was asked.
#[derive(Debug, Error)]
pub enum PlacementError {
    #[error("no valid position for {entity} within {radius} cells of ({x}, {y})")]
    NoValidPosition {
        entity: String,
        x: i32,
        y: i32,
        radius: i32,
    },

    #[error("{0} collides with an existing room")]
    Collision(String),

    #[error("position ({x}, {y}) is off the grid")]
    OffGrid { x: i32, y: i32 },
}

/// Errors related to document bookkeeping.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("entity not found: {0}")]
    EntityNotFound(String),

    #[error("duplicate id: {0}")]
    DuplicateId(String),

    #[error("room {0} belongs to a template; edit it through template edit mode")]
    TemplateRoom(String),

    #[error("a template needs at least one room")]
    EmptyTemplate,

    #[error("no template edit session is active")]
    NoEditSession,

    #[error("template {0} is already being edited")]
    EditSessionActive(String),

    #[error("failed to serialize document: {0}")]
    Serialize(String),
}

/// Errors raised while importing a serialized document.
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Invalid data format: {0}")]
    InvalidFormat(String),
}

/// Errors related to loading editor configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {message}")]
    Read { path: String, message: String },

    #[error("failed to parse config: {0}")]
    Parse(String),

    #[error("invalid config value for {field}: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

/// Convenience type alias for results using [`PlanError`].
pub type Result<T> = std::result::Result<T, PlanError>;
