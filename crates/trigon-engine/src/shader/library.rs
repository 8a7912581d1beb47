use std::borrow::Cow;
use std::fmt;

use super::ShaderError;

/// Vertex entry point of the triangle library.
pub const VERTEX_MAIN: &str = "vertex_main";
/// Fragment entry point of the triangle library.
pub const FRAGMENT_MAIN: &str = "fragment_main";
/// Compute kernel rotating the vertex buffer in place.
pub const TRANSFORM: &str = "transform";

/// Pipeline stage of a shader entry point.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub enum Stage {
    Vertex,
    Fragment,
    Compute,
}

impl Stage {
    fn from_naga(stage: naga::ShaderStage) -> Option<Self> {
        match stage {
            naga::ShaderStage::Vertex => Some(Self::Vertex),
            naga::ShaderStage::Fragment => Some(Self::Fragment),
            naga::ShaderStage::Compute => Some(Self::Compute),
            _ => None,
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Vertex => "vertex",
            Self::Fragment => "fragment",
            Self::Compute => "compute",
        })
    }
}

/// A resolved entry point: known to exist in the library with the requested stage.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ShaderFunction {
    name: String,
    stage: Stage,
}

impl ShaderFunction {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn stage(&self) -> Stage {
        self.stage
    }
}

/// A collection of shader functions compiled from one WGSL source.
///
/// The source is parsed and validated when the library is loaded, so entry point
/// lookups can fail with a typed error before any GPU object is created.
#[derive(Debug, Clone)]
pub struct ShaderLibrary {
    label: String,
    source: Cow<'static, str>,
    entry_points: Vec<(String, Stage)>,
}

impl ShaderLibrary {
    /// The bundled library providing `vertex_main`, `fragment_main` and `transform`.
    pub fn triangle() -> Result<Self, ShaderError> {
        Self::from_wgsl("triangle", include_str!("shaders/triangle.wgsl"))
    }

    /// Parses and validates `source`.
    pub fn from_wgsl(
        label: impl Into<String>,
        source: impl Into<Cow<'static, str>>,
    ) -> Result<Self, ShaderError> {
        let label = label.into();
        let source = source.into();

        let module = naga::front::wgsl::parse_str(&source).map_err(|e| ShaderError::Parse {
            label: label.clone(),
            message: e.emit_to_string(&source),
        })?;

        naga::valid::Validator::new(
            naga::valid::ValidationFlags::all(),
            naga::valid::Capabilities::all(),
        )
        .validate(&module)
        .map_err(|e| ShaderError::Validation {
            label: label.clone(),
            message: e.emit_to_string(&source),
        })?;

        let entry_points = module
            .entry_points
            .iter()
            .filter_map(|ep| Stage::from_naga(ep.stage).map(|stage| (ep.name.clone(), stage)))
            .collect::<Vec<_>>();

        log::debug!(
            "shader library `{label}` loaded with {} entry point(s)",
            entry_points.len()
        );

        Ok(Self {
            label,
            source,
            entry_points,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Entry points in declaration order.
    pub fn entry_points(&self) -> impl Iterator<Item = (&str, Stage)> {
        self.entry_points.iter().map(|(n, s)| (n.as_str(), *s))
    }

    /// Resolves the entry point `name` and checks that it belongs to `stage`.
    pub fn function(&self, name: &str, stage: Stage) -> Result<ShaderFunction, ShaderError> {
        let Some((_, found)) = self.entry_points.iter().find(|(n, _)| n == name) else {
            return Err(ShaderError::MissingEntryPoint {
                label: self.label.clone(),
                name: name.to_string(),
            });
        };

        if *found != stage {
            return Err(ShaderError::WrongStage {
                name: name.to_string(),
                expected: stage,
                found: *found,
            });
        }

        Ok(ShaderFunction {
            name: name.to_string(),
            stage,
        })
    }

    /// Compiles the library source into a device shader module.
    pub fn create_module(&self, device: &wgpu::Device) -> wgpu::ShaderModule {
        device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(&self.label),
            source: wgpu::ShaderSource::Wgsl(self.source.clone()),
        })
    }
}
