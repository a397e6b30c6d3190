//! Shader interface reflection.
//!
//! Parses and validates WGSL with naga and extracts the input/output records of
//! the entry points, so host-side vertex buffer layouts can be checked against
//! what the vertex stage actually declares.

use std::collections::BTreeMap;

use anyhow::{Context, Result, anyhow, bail};
use naga::{Binding, BuiltIn, Handle, Module, ScalarKind, ShaderStage, Type, TypeInner};

use super::variant::ShaderVariant;

/// Scalar kind + component count of a located input or output.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct AttributeShape {
    pub kind: ScalarKind,
    pub components: u32,
}

impl AttributeShape {
    pub const fn new(kind: ScalarKind, components: u32) -> Self {
        Self { kind, components }
    }

    /// Shape delivered by a vertex attribute format, if it is one we can compare.
    pub fn of_vertex_format(format: wgpu::VertexFormat) -> Option<Self> {
        use wgpu::VertexFormat as F;
        let (kind, components) = match format {
            F::Float32 => (ScalarKind::Float, 1),
            F::Float32x2 => (ScalarKind::Float, 2),
            F::Float32x3 => (ScalarKind::Float, 3),
            F::Float32x4 => (ScalarKind::Float, 4),
            F::Uint32 => (ScalarKind::Uint, 1),
            F::Uint32x2 => (ScalarKind::Uint, 2),
            F::Uint32x3 => (ScalarKind::Uint, 3),
            F::Uint32x4 => (ScalarKind::Uint, 4),
            F::Sint32 => (ScalarKind::Sint, 1),
            F::Sint32x2 => (ScalarKind::Sint, 2),
            F::Sint32x3 => (ScalarKind::Sint, 3),
            F::Sint32x4 => (ScalarKind::Sint, 4),
            _ => return None,
        };
        Some(Self::new(kind, components))
    }
}

/// Located and built-in bindings of one entry point's inputs or outputs.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StageRecord {
    pub locations: BTreeMap<u32, AttributeShape>,
    pub builtins: Vec<BuiltIn>,
}

impl StageRecord {
    pub fn has_builtin(&self, builtin: BuiltIn) -> bool {
        self.builtins.contains(&builtin)
    }
}

/// Reflected interface of a vertex + fragment program.
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderInterface {
    pub vertex_inputs: StageRecord,
    pub vertex_outputs: StageRecord,
    pub fragment_inputs: StageRecord,
    pub fragment_outputs: StageRecord,
}

/// Parses and validates WGSL source.
///
/// Errors carry naga's source-annotated diagnostic.
pub fn parse_and_validate(label: &str, source: &str) -> Result<(Module, naga::valid::ModuleInfo)> {
    let module = naga::front::wgsl::parse_str(source)
        .map_err(|e| anyhow!(e.emit_to_string(source)))
        .with_context(|| format!("failed to parse WGSL for `{label}`"))?;

    let info = naga::valid::Validator::new(
        naga::valid::ValidationFlags::all(),
        naga::valid::Capabilities::all(),
    )
    .validate(&module)
    .map_err(|e| anyhow!(e.emit_to_string(source)))
    .with_context(|| format!("WGSL for `{label}` failed validation"))?;

    Ok((module, info))
}

impl ShaderInterface {
    /// Reflects the interface of a variant's program.
    pub fn reflect(variant: ShaderVariant) -> Result<Self> {
        let (module, _info) = parse_and_validate(variant.label(), variant.source())?;
        Self::from_module(&module, ShaderVariant::VERTEX_ENTRY, ShaderVariant::FRAGMENT_ENTRY)
    }

    /// Reflects the interface of the named entry points in `module`.
    pub fn from_module(module: &Module, vertex_entry: &str, fragment_entry: &str) -> Result<Self> {
        let vs = find_entry(module, vertex_entry, ShaderStage::Vertex)?;
        let fs = find_entry(module, fragment_entry, ShaderStage::Fragment)?;

        let (vertex_inputs, vertex_outputs) = entry_records(module, vs)?;
        let (fragment_inputs, fragment_outputs) = entry_records(module, fs)?;

        Ok(Self {
            vertex_inputs,
            vertex_outputs,
            fragment_inputs,
            fragment_outputs,
        })
    }

    /// Checks that `buffers` supply exactly the located inputs of the vertex stage.
    pub fn check_vertex_layout(&self, buffers: &[wgpu::VertexBufferLayout<'_>]) -> Result<()> {
        let mut supplied: BTreeMap<u32, wgpu::VertexFormat> = BTreeMap::new();
        for (slot, buffer) in buffers.iter().enumerate() {
            for attr in buffer.attributes {
                if supplied.insert(attr.shader_location, attr.format).is_some() {
                    bail!(
                        "vertex buffer slot {slot} redefines shader location {}",
                        attr.shader_location
                    );
                }
            }
        }

        for (location, expected) in &self.vertex_inputs.locations {
            let Some(format) = supplied.get(location) else {
                bail!("vertex stage reads location {location} but no buffer attribute provides it");
            };
            let Some(shape) = AttributeShape::of_vertex_format(*format) else {
                bail!("unsupported vertex format {format:?} at location {location}");
            };
            if shape != *expected {
                bail!(
                    "location {location}: buffer supplies {format:?}, shader expects {:?} x{}",
                    expected.kind,
                    expected.components
                );
            }
        }

        if let Some(extra) = supplied
            .keys()
            .find(|loc| !self.vertex_inputs.locations.contains_key(loc))
        {
            bail!("buffer attribute at location {extra} is not consumed by the vertex stage");
        }

        Ok(())
    }

    /// Checks that every varying the fragment stage reads is written by the vertex stage.
    pub fn check_stage_linkage(&self) -> Result<()> {
        for (location, shape) in &self.fragment_inputs.locations {
            match self.vertex_outputs.locations.get(location) {
                Some(out) if out == shape => {}
                Some(out) => bail!(
                    "varying {location}: vertex stage writes {:?} x{}, \
                     fragment stage reads {:?} x{}",
                    out.kind,
                    out.components,
                    shape.kind,
                    shape.components
                ),
                None => bail!(
                    "fragment stage reads varying {location} that the vertex stage never writes"
                ),
            }
        }
        anyhow::ensure!(
            self.vertex_outputs.builtins.iter().any(|b| matches!(b, BuiltIn::Position { .. })),
            "vertex stage does not write @builtin(position)"
        );
        Ok(())
    }

    /// Checks the single `vec4<f32>` color target both programs write.
    pub fn check_color_target(&self) -> Result<()> {
        let expected = AttributeShape::new(ScalarKind::Float, 4);
        let targets = &self.fragment_outputs.locations;
        if targets.len() == 1 && targets.get(&0) == Some(&expected) {
            return Ok(());
        }
        bail!("fragment stage must write exactly one vec4<f32> at location 0, found {targets:?}")
    }
}

/// Reflects and checks one variant against its host-side layouts.
pub fn check_variant(variant: ShaderVariant) -> Result<ShaderInterface> {
    let iface = ShaderInterface::reflect(variant)?;

    iface
        .check_vertex_layout(variant.vertex_buffers())
        .with_context(|| format!("`{variant}` vertex layout mismatch"))?;
    iface
        .check_stage_linkage()
        .with_context(|| format!("`{variant}` stage linkage mismatch"))?;
    iface
        .check_color_target()
        .with_context(|| format!("`{variant}` color target mismatch"))?;

    if !variant.uses_vertex_buffer() {
        anyhow::ensure!(
            iface.vertex_inputs.has_builtin(BuiltIn::VertexIndex),
            "`{variant}` reads no vertex buffer, so it must take @builtin(vertex_index)"
        );
    }

    Ok(iface)
}

/// Checks every shader variant; intended to run once at startup.
pub fn validate_all() -> Result<()> {
    for variant in ShaderVariant::ALL {
        check_variant(variant)?;
        log::debug!("shader `{variant}` validated");
    }
    Ok(())
}

fn find_entry<'m>(
    module: &'m Module,
    name: &str,
    stage: ShaderStage,
) -> Result<&'m naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.name == name && ep.stage == stage)
        .with_context(|| format!("no {stage:?} entry point named `{name}`"))
}

fn entry_records(module: &Module, ep: &naga::EntryPoint) -> Result<(StageRecord, StageRecord)> {
    let mut inputs = StageRecord::default();
    for arg in &ep.function.arguments {
        collect_bindings(module, arg.ty, arg.binding.as_ref(), &mut inputs)
            .with_context(|| format!("argument of `{}`", ep.name))?;
    }

    let mut outputs = StageRecord::default();
    if let Some(result) = &ep.function.result {
        collect_bindings(module, result.ty, result.binding.as_ref(), &mut outputs)
            .with_context(|| format!("result of `{}`", ep.name))?;
    }

    Ok((inputs, outputs))
}

fn collect_bindings(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    record: &mut StageRecord,
) -> Result<()> {
    match binding {
        Some(Binding::Location { location, .. }) => {
            let shape = shape_of(module, ty)
                .with_context(|| format!("location {location} has a non-scalar, non-vector type"))?;
            record.locations.insert(*location, shape);
        }
        Some(Binding::BuiltIn(builtin)) => record.builtins.push(*builtin),
        None => match &module.types[ty].inner {
            TypeInner::Struct { members, .. } => {
                for member in members {
                    collect_bindings(module, member.ty, member.binding.as_ref(), record)?;
                }
            }
            other => bail!("unbound entry point value of type {other:?}"),
        },
    }
    Ok(())
}

fn shape_of(module: &Module, ty: Handle<Type>) -> Option<AttributeShape> {
    match module.types[ty].inner {
        TypeInner::Scalar(scalar) => Some(AttributeShape::new(scalar.kind, 1)),
        TypeInner::Vector { size, scalar } => Some(AttributeShape::new(scalar.kind, size as u32)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const VEC3: AttributeShape = AttributeShape::new(ScalarKind::Float, 3);

    #[test]
    fn all_variants_validate() {
        validate_all().unwrap();
    }

    #[test]
    fn vertex_color_reads_position_and_color() {
        let iface = ShaderInterface::reflect(ShaderVariant::VertexColor).unwrap();
        let expected: BTreeMap<u32, AttributeShape> = [(0, VEC3), (1, VEC3)].into();
        assert_eq!(iface.vertex_inputs.locations, expected);
        assert!(iface.vertex_inputs.builtins.is_empty());
        assert_eq!(iface.vertex_outputs.locations.get(&0), Some(&VEC3));
    }

    #[test]
    fn solid_triangle_reads_only_the_vertex_index() {
        let iface = ShaderInterface::reflect(ShaderVariant::SolidTriangle).unwrap();
        assert!(iface.vertex_inputs.locations.is_empty());
        assert_eq!(iface.vertex_inputs.builtins, vec![BuiltIn::VertexIndex]);
        assert!(iface.fragment_inputs.locations.is_empty());
    }

    #[test]
    fn both_variants_write_one_vec4_target() {
        for v in ShaderVariant::ALL {
            let iface = ShaderInterface::reflect(v).unwrap();
            iface.check_color_target().unwrap();
        }
    }

    #[test]
    fn rejects_attribute_with_wrong_width() {
        const ATTRS: [wgpu::VertexAttribute; 2] =
            wgpu::vertex_attr_array![0 => Float32x3, 1 => Float32x2];
        let layout = wgpu::VertexBufferLayout {
            array_stride: 20,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRS,
        };
        let iface = ShaderInterface::reflect(ShaderVariant::VertexColor).unwrap();
        let err = iface.check_vertex_layout(&[layout]).unwrap_err();
        assert!(err.to_string().contains("location 1"), "{err:#}");
    }

    #[test]
    fn rejects_missing_attribute() {
        const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x3];
        let layout = wgpu::VertexBufferLayout {
            array_stride: 12,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &ATTRS,
        };
        let iface = ShaderInterface::reflect(ShaderVariant::VertexColor).unwrap();
        assert!(iface.check_vertex_layout(&[layout]).is_err());
        assert!(iface.check_vertex_layout(&[]).is_err());
    }

    #[test]
    fn rejects_unconsumed_attribute() {
        let iface = ShaderInterface::reflect(ShaderVariant::SolidTriangle).unwrap();
        let err = iface
            .check_vertex_layout(&[crate::shader::ColorVertex::layout()])
            .unwrap_err();
        assert!(err.to_string().contains("not consumed"), "{err:#}");
    }

    #[test]
    fn rejects_duplicate_location_across_buffers() {
        let iface = ShaderInterface::reflect(ShaderVariant::VertexColor).unwrap();
        let layout = crate::shader::ColorVertex::layout();
        assert!(iface.check_vertex_layout(&[layout.clone(), layout]).is_err());
    }

    #[test]
    fn reports_parse_errors() {
        let err = parse_and_validate("broken", "fn vs_main( -> {").unwrap_err();
        assert!(format!("{err:#}").contains("broken"));
    }

    #[test]
    fn detects_unlinked_varying() {
        let src = r#"
            struct VsOut { @builtin(position) pos: vec4<f32> };
            struct FsIn { @location(0) color: vec3<f32> };
            @vertex fn vs_main() -> VsOut {
                var out: VsOut;
                out.pos = vec4<f32>(0.0, 0.0, 0.0, 1.0);
                return out;
            }
            @fragment fn fs_main(in: FsIn) -> @location(0) vec4<f32> {
                return vec4<f32>(in.color, 1.0);
            }
        "#;
        let (module, _) = parse_and_validate("unlinked", src).unwrap();
        let iface = ShaderInterface::from_module(&module, "vs_main", "fs_main").unwrap();
        assert!(iface.check_stage_linkage().is_err());
    }
}
