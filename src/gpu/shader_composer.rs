//! WGSL composition with `#import` support via naga_oil.

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, NagaModuleDescriptor, ShaderLanguage, ShaderType,
};
use std::borrow::Cow;

use crate::error::GlintError;

/// Wraps `naga_oil::compose::Composer` to provide shader composition with `#import` support.
///
/// Pre-loads all shared WGSL modules at construction time. Consuming shaders use
/// `#import glint::module_name` to pull in shared code. The composer produces
/// `naga::Module` IR directly, skipping WGSL re-parse at runtime.
pub struct ShaderComposer {
    composer: Composer,
}

/// Shared module definition: (source, file_path)
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

impl ShaderComposer {
    /// Build a composer with all shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::ShaderCompile`] if a shared module fails to
    /// parse — a build-time asset problem, so startup aborts.
    pub fn new() -> Result<Self, GlintError> {
        let mut composer = Composer::default();

        // Register shared modules in dependency order.
        let modules: &[ModuleDef] = &[ModuleDef {
            source: include_str!("../../assets/shaders/modules/fullscreen.wgsl"),
            file_path: "modules/fullscreen.wgsl",
        }];

        for m in modules {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| GlintError::ShaderCompile {
                    name: m.file_path.to_owned(),
                    message: format!("{e:?}"),
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import` directives)
    /// into a `wgpu::ShaderModule` ready for pipeline creation.
    ///
    /// # Errors
    ///
    /// Returns [`GlintError::ShaderCompile`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
    ) -> Result<wgpu::ShaderModule, GlintError> {
        let naga_module = self
            .composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(|e| GlintError::ShaderCompile {
                name: file_path.to_owned(),
                message: e.to_string(),
            })?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a wgpu shader module.
    /// Useful for testing shader composition without a GPU device.
    ///
    /// # Errors
    ///
    /// Returns the boxed composer error on failure.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
    ) -> Result<naga::Module, Box<naga_oil::compose::ComposerError>> {
        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                ..Default::default()
            })
            .map_err(Box::new)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Shader source definitions for all composable shaders in the project.
    /// Each entry is (source, file_path).
    fn all_shader_sources() -> Vec<(&'static str, &'static str)> {
        vec![
            (
                include_str!("../../assets/shaders/pathtrace.wgsl"),
                "pathtrace.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/post.wgsl"),
                "post.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/bloom_prefilter.wgsl"),
                "bloom_prefilter.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/bloom_downsample.wgsl"),
                "bloom_downsample.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/bloom_upsample.wgsl"),
                "bloom_upsample.wgsl",
            ),
            (
                include_str!("../../assets/shaders/screen/composite.wgsl"),
                "composite.wgsl",
            ),
        ]
    }

    #[test]
    fn test_all_shaders_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path) in all_shader_sources() {
            let _ = composer
                .compose_naga(source, file_path)
                .unwrap_or_else(|e| panic!("Shader '{}' failed to compose: {}", file_path, e));
        }
    }
}
