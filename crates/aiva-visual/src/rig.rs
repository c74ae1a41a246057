//! Rig Binding - how the mouth is driven on a given avatar
//!
//! The host engine describes what the loaded avatar exposes (meshes with
//! their morph targets, bones). Binding picks one drive strategy once; the
//! [`MouthDriver`] then turns samples into a [`MouthPose`] every frame.

use aiva_core::{AivaError, AivaResult};
use serde::Deserialize;
use tracing::debug;

/// A mesh of the loaded avatar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MeshDescription {
    pub name: String,
    /// Morph target (blend shape) names, by index
    pub morph_targets: Vec<String>,
}

impl MeshDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            morph_targets: Vec::new(),
        }
    }

    pub fn with_morph_targets<I, S>(mut self, targets: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.morph_targets = targets.into_iter().map(Into::into).collect();
        self
    }
}

/// A bone of the loaded avatar
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoneDescription {
    pub name: String,
}

impl BoneDescription {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// What an avatar exposes, in scene traversal order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AvatarDescription {
    pub meshes: Vec<MeshDescription>,
    pub bones: Vec<BoneDescription>,
}

/// Naming conventions and gains for mouth binding
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RigConfig {
    /// Morph target names that open the mouth, in priority order
    pub morph_targets: Vec<String>,
    /// Substrings (lowercase) identifying the jaw bone
    pub jaw_keywords: Vec<String>,
    /// Substrings (lowercase) identifying the mouth mesh
    pub mouth_keywords: Vec<String>,
    /// Jaw rotation (radians, around x) at full openness
    pub jaw_rotation_gain: f32,
    /// Extra vertical scale at full openness
    pub mesh_scale_gain: f32,
    /// Amplitude of the speaking wobble added to the sample volume
    pub wobble_amplitude: f32,
    /// Wobble angular rate, radians per millisecond
    pub wobble_rate: f32,
}

impl Default for RigConfig {
    fn default() -> Self {
        Self {
            morph_targets: vec!["mouthOpen".into(), "mouth_open".into(), "speak".into()],
            jaw_keywords: vec!["jaw".into(), "cene".into()],
            mouth_keywords: vec!["mouth".into(), "agiz".into()],
            jaw_rotation_gain: -0.2,
            mesh_scale_gain: 0.5,
            wobble_amplitude: 0.2,
            wobble_rate: 0.01,
        }
    }
}

/// Chosen drive strategy, with indices into the [`AvatarDescription`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MouthDrive {
    MorphTarget { mesh: usize, target: usize },
    JawBone { bone: usize },
    MeshScale { mesh: usize },
}

/// Result of binding an avatar
#[derive(Debug, Clone, PartialEq)]
pub struct RigBinding {
    pub drive: MouthDrive,
    /// Name of the driven mesh or bone
    pub node_name: String,
}

fn name_matches(name: &str, keywords: &[String]) -> bool {
    let lower = name.to_lowercase();
    keywords.iter().any(|k| lower.contains(k.as_str()))
}

impl RigBinding {
    /// Choose how to drive the mouth of `avatar`
    pub fn bind(avatar: &AvatarDescription, config: &RigConfig) -> AivaResult<Self> {
        let mouth_mesh = avatar
            .meshes
            .iter()
            .position(|m| name_matches(&m.name, &config.mouth_keywords));

        // 1. Morph target: the mouth mesh first, then any mesh
        let search_order = mouth_mesh
            .into_iter()
            .chain((0..avatar.meshes.len()).filter(|i| Some(*i) != mouth_mesh));

        for mesh_idx in search_order {
            let mesh = &avatar.meshes[mesh_idx];
            for wanted in &config.morph_targets {
                if let Some(target) = mesh.morph_targets.iter().position(|t| t == wanted) {
                    debug!(mesh = %mesh.name, target = %wanted, "mouth bound to morph target");
                    return Ok(Self {
                        drive: MouthDrive::MorphTarget {
                            mesh: mesh_idx,
                            target,
                        },
                        node_name: mesh.name.clone(),
                    });
                }
            }
        }

        // 2. Jaw bone
        if let Some(bone) = avatar
            .bones
            .iter()
            .position(|b| name_matches(&b.name, &config.jaw_keywords))
        {
            debug!(bone = %avatar.bones[bone].name, "mouth bound to jaw bone");
            return Ok(Self {
                drive: MouthDrive::JawBone { bone },
                node_name: avatar.bones[bone].name.clone(),
            });
        }

        // 3. Mesh scale: the mouth mesh, else the first mesh
        let mesh = mouth_mesh
            .or((!avatar.meshes.is_empty()).then_some(0))
            .ok_or(AivaError::RigUnbound)?;
        debug!(mesh = %avatar.meshes[mesh].name, "mouth bound to mesh scale");
        Ok(Self {
            drive: MouthDrive::MeshScale { mesh },
            node_name: avatar.meshes[mesh].name.clone(),
        })
    }
}

/// Value to apply to the bound node this frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MouthPose {
    MorphInfluence { mesh: usize, target: usize, value: f32 },
    JawRotation { bone: usize, x: f32 },
    MeshScale { mesh: usize, y: f32 },
}

/// Maps sample volume to the bound drive
#[derive(Debug, Clone)]
pub struct MouthDriver {
    binding: RigBinding,
    config: RigConfig,
}

impl MouthDriver {
    pub fn new(binding: RigBinding, config: RigConfig) -> Self {
        Self { binding, config }
    }

    pub fn binding(&self) -> &RigBinding {
        &self.binding
    }

    /// Openness after the speaking wobble, never negative
    pub fn openness(&self, volume: f32, t_ms: f64) -> f32 {
        let wobble = (t_ms * self.config.wobble_rate as f64).sin() as f32;
        (volume + wobble * self.config.wobble_amplitude).max(0.0)
    }

    /// Pose for this frame. Not speaking yields the rest pose.
    pub fn pose(&self, speaking: bool, volume: f32, t_ms: f64) -> MouthPose {
        let open = if speaking {
            self.openness(volume, t_ms)
        } else {
            0.0
        };

        match self.binding.drive {
            MouthDrive::MorphTarget { mesh, target } => MouthPose::MorphInfluence {
                mesh,
                target,
                value: open,
            },
            MouthDrive::JawBone { bone } => MouthPose::JawRotation {
                bone,
                x: open * self.config.jaw_rotation_gain,
            },
            MouthDrive::MeshScale { mesh } => MouthPose::MeshScale {
                mesh,
                y: 1.0 + open * self.config.mesh_scale_gain,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn avatar() -> AvatarDescription {
        AvatarDescription {
            meshes: vec![
                MeshDescription::new("Head"),
                MeshDescription::new("Mouth_Mesh").with_morph_targets(["smile", "mouth_open"]),
            ],
            bones: vec![BoneDescription::new("Neck"), BoneDescription::new("JawBone")],
        }
    }

    #[test]
    fn test_morph_target_preferred() {
        let binding = RigBinding::bind(&avatar(), &RigConfig::default()).unwrap();
        assert_eq!(binding.drive, MouthDrive::MorphTarget { mesh: 1, target: 1 });
        assert_eq!(binding.node_name, "Mouth_Mesh");
    }

    #[test]
    fn test_morph_target_priority_order() {
        let mut avatar = avatar();
        avatar.meshes[1] =
            MeshDescription::new("mouth").with_morph_targets(["speak", "mouthOpen"]);
        let binding = RigBinding::bind(&avatar, &RigConfig::default()).unwrap();
        assert_eq!(binding.drive, MouthDrive::MorphTarget { mesh: 1, target: 1 });
    }

    #[test]
    fn test_jaw_fallback() {
        let mut avatar = avatar();
        avatar.meshes[1].morph_targets.clear();
        let binding = RigBinding::bind(&avatar, &RigConfig::default()).unwrap();
        assert_eq!(binding.drive, MouthDrive::JawBone { bone: 1 });

        avatar.bones = vec![BoneDescription::new("cene_kemigi")];
        let binding = RigBinding::bind(&avatar, &RigConfig::default()).unwrap();
        assert_eq!(binding.drive, MouthDrive::JawBone { bone: 0 });
    }

    #[test]
    fn test_mesh_scale_fallback() {
        let avatar = AvatarDescription {
            meshes: vec![MeshDescription::new("Body"), MeshDescription::new("Agiz")],
            bones: vec![],
        };
        let binding = RigBinding::bind(&avatar, &RigConfig::default()).unwrap();
        assert_eq!(binding.drive, MouthDrive::MeshScale { mesh: 1 });

        let avatar = AvatarDescription {
            meshes: vec![MeshDescription::new("Body")],
            bones: vec![],
        };
        let binding = RigBinding::bind(&avatar, &RigConfig::default()).unwrap();
        assert_eq!(binding.drive, MouthDrive::MeshScale { mesh: 0 });
    }

    #[test]
    fn test_unbound() {
        let result = RigBinding::bind(&AvatarDescription::default(), &RigConfig::default());
        assert_eq!(result, Err(AivaError::RigUnbound));
    }

    #[test]
    fn test_rest_pose() {
        let config = RigConfig::default();
        for drive in [
            MouthDrive::MorphTarget { mesh: 0, target: 0 },
            MouthDrive::JawBone { bone: 0 },
            MouthDrive::MeshScale { mesh: 0 },
        ] {
            let driver = MouthDriver::new(
                RigBinding {
                    drive,
                    node_name: "n".into(),
                },
                config.clone(),
            );
            let rest = match driver.pose(false, 0.8, 1234.0) {
                MouthPose::MorphInfluence { value, .. } => value,
                MouthPose::JawRotation { x, .. } => x,
                MouthPose::MeshScale { y, .. } => y - 1.0,
            };
            assert_eq!(rest, 0.0);
        }
    }

    #[test]
    fn test_speaking_pose() {
        let binding = RigBinding {
            drive: MouthDrive::JawBone { bone: 2 },
            node_name: "jaw".into(),
        };
        let driver = MouthDriver::new(binding, RigConfig::default());

        // sin(0) = 0: no wobble
        assert_eq!(driver.pose(true, 0.5, 0.0), MouthPose::JawRotation { bone: 2, x: -0.1 });
    }

    #[test]
    fn test_config_from_json() {
        let config: RigConfig =
            serde_json::from_str(r#"{ "jaw_keywords": ["kiefer"], "mesh_scale_gain": 0.25 }"#)
                .unwrap();
        assert_eq!(config.jaw_keywords, vec!["kiefer".to_string()]);
        assert_eq!(config.mesh_scale_gain, 0.25);
        assert_eq!(config.morph_targets.len(), 3);
    }

    proptest! {
        #[test]
        fn prop_openness_never_negative(volume in 0.0f32..=1.0, t in 0.0f64..1.0e7) {
            let driver = MouthDriver::new(
                RigBinding { drive: MouthDrive::MeshScale { mesh: 0 }, node_name: "m".into() },
                RigConfig::default(),
            );
            let open = driver.openness(volume, t);
            prop_assert!(open >= 0.0);
            prop_assert!(open <= volume + 0.2 + f32::EPSILON);
        }
    }
}
