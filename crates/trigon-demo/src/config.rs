use anyhow::{Context, Result, bail};
use trigon_engine::shader::ShaderVariant;

/// Environment variable naming the starting shader variant.
pub const VARIANT_ENV: &str = "TRIGON_VARIANT";

/// Startup configuration of the demo.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DemoConfig {
    pub variant: ShaderVariant,
}

impl DemoConfig {
    /// Builds the config from CLI arguments (program name excluded) and the
    /// value of [`VARIANT_ENV`]. The argument wins over the environment.
    pub fn from_sources<I>(mut args: I, env_variant: Option<String>) -> Result<Self>
    where
        I: Iterator<Item = String>,
    {
        let arg = args.next();
        if let Some(extra) = args.next() {
            bail!("unexpected argument `{extra}`; usage: trigon-demo [solid|vertex-color]");
        }

        let variant = match (arg, env_variant) {
            (Some(name), _) => name.parse().context("invalid shader variant argument")?,
            (None, Some(name)) => name
                .parse()
                .with_context(|| format!("invalid {VARIANT_ENV}"))?,
            (None, None) => ShaderVariant::default(),
        };

        Ok(Self { variant })
    }

    pub fn from_env() -> Result<Self> {
        Self::from_sources(std::env::args().skip(1), std::env::var(VARIANT_ENV).ok())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(v: &[&str]) -> std::vec::IntoIter<String> {
        v.iter().map(|s| s.to_string()).collect::<Vec<_>>().into_iter()
    }

    #[test]
    fn defaults_to_vertex_color() {
        let cfg = DemoConfig::from_sources(args(&[]), None).unwrap();
        assert_eq!(cfg.variant, ShaderVariant::VertexColor);
    }

    #[test]
    fn argument_overrides_environment() {
        let cfg = DemoConfig::from_sources(args(&["solid"]), Some("vertex-color".into())).unwrap();
        assert_eq!(cfg.variant, ShaderVariant::SolidTriangle);
    }

    #[test]
    fn environment_is_used_without_argument() {
        let cfg = DemoConfig::from_sources(args(&[]), Some("solid-triangle".into())).unwrap();
        assert_eq!(cfg.variant, ShaderVariant::SolidTriangle);
    }

    #[test]
    fn rejects_unknown_variant_and_extra_arguments() {
        let err = DemoConfig::from_sources(args(&["wireframe"]), None).unwrap_err();
        assert!(format!("{err:#}").contains("wireframe"));
        assert!(DemoConfig::from_sources(args(&["solid", "again"]), None).is_err());
        assert!(DemoConfig::from_sources(args(&[]), Some("nope".into())).is_err());
    }
}
