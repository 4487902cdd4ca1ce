//! 音色参数
//!
//! `VoiceProfile` 是设定存储中的文档形态（百分比），
//! `SynthesisParams` 是交给合成引擎的原生参数。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

/// 音色种类
///
/// 每个种类对应音色模型目录下的一个 .htsvoice 文件
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoiceKind {
    Normal,
    Happy,
    Bashful,
    Angry,
    Sad,
    Male,
    Miku,
}

impl VoiceKind {
    /// 全部可用音色
    pub const ALL: [VoiceKind; 7] = [
        VoiceKind::Normal,
        VoiceKind::Happy,
        VoiceKind::Bashful,
        VoiceKind::Angry,
        VoiceKind::Sad,
        VoiceKind::Male,
        VoiceKind::Miku,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            VoiceKind::Normal => "normal",
            VoiceKind::Happy => "happy",
            VoiceKind::Bashful => "bashful",
            VoiceKind::Angry => "angry",
            VoiceKind::Sad => "sad",
            VoiceKind::Male => "male",
            VoiceKind::Miku => "miku",
        }
    }

    /// 音色模型文件路径（相对于音色根目录）
    pub fn model_path(&self, voice_dir: &Path) -> PathBuf {
        let rel = match self {
            VoiceKind::Normal => "mei/mei_normal.htsvoice",
            VoiceKind::Happy => "mei/mei_happy.htsvoice",
            VoiceKind::Bashful => "mei/mei_bashful.htsvoice",
            VoiceKind::Angry => "mei/mei_angry.htsvoice",
            VoiceKind::Sad => "mei/mei_sad.htsvoice",
            VoiceKind::Male => "m100/nitech_jp_atr503_m001.htsvoice",
            VoiceKind::Miku => "miku/miku.htsvoice",
        };
        voice_dir.join(rel)
    }
}

impl fmt::Display for VoiceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VoiceKind {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        VoiceKind::ALL
            .iter()
            .copied()
            .find(|kind| kind.as_str() == s)
            .ok_or(())
    }
}

impl Default for VoiceKind {
    fn default() -> Self {
        VoiceKind::Normal
    }
}

/// 夹取到闭区间
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    debug_assert!(min <= max);
    value.max(min).min(max)
}

/// 线性插值
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// 用户音色设定（存储文档形态）
///
/// 不变量: 所有数值参数在插值前先夹取到 [0,100]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoiceProfile {
    #[serde(default)]
    pub voice: VoiceKind,

    /// 语速（0~100）
    #[serde(default = "default_percent")]
    pub speed: f64,

    /// 音调（0~100）
    #[serde(default = "default_percent")]
    pub tone: f64,

    /// 抑扬（0~100）
    #[serde(default = "default_percent")]
    pub intone: f64,

    /// 清浊阈值（0~100）
    #[serde(default = "default_percent")]
    pub threshold: f64,
}

fn default_percent() -> f64 {
    50.0
}

impl Default for VoiceProfile {
    fn default() -> Self {
        Self {
            voice: VoiceKind::Normal,
            speed: default_percent(),
            tone: default_percent(),
            intone: default_percent(),
            threshold: default_percent(),
        }
    }
}

impl VoiceProfile {
    /// 映射到合成引擎的原生参数区间
    ///
    /// speed→[0.5,2.0] tone→[-20,20] intone→[0,4] threshold→[0,1]
    pub fn interpolate(&self) -> SynthesisParams {
        SynthesisParams {
            voice: self.voice,
            speed: lerp(0.5, 2.0, clamp(self.speed, 0.0, 100.0) / 100.0),
            tone: lerp(-20.0, 20.0, clamp(self.tone, 0.0, 100.0) / 100.0),
            intone: lerp(0.0, 4.0, clamp(self.intone, 0.0, 100.0) / 100.0),
            threshold: lerp(0.0, 1.0, clamp(self.threshold, 0.0, 100.0) / 100.0),
        }
    }
}

/// 合成引擎的原生参数
#[derive(Debug, Clone, PartialEq)]
pub struct SynthesisParams {
    pub voice: VoiceKind,
    pub speed: f64,
    pub tone: f64,
    pub intone: f64,
    pub threshold: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_kind_round_trip() {
        for kind in VoiceKind::ALL {
            assert_eq!(kind.as_str().parse::<VoiceKind>(), Ok(kind));
        }
        assert!("ghost".parse::<VoiceKind>().is_err());
    }

    #[test]
    fn test_model_path() {
        let path = VoiceKind::Miku.model_path(Path::new("/usr/share/hts-voice"));
        assert_eq!(path, PathBuf::from("/usr/share/hts-voice/miku/miku.htsvoice"));
    }

    #[test]
    fn test_speed_interpolation_endpoints() {
        let mut profile = VoiceProfile::default();

        profile.speed = 0.0;
        assert!((profile.interpolate().speed - 0.5).abs() < f64::EPSILON);

        profile.speed = 100.0;
        assert!((profile.interpolate().speed - 2.0).abs() < f64::EPSILON);

        profile.speed = 50.0;
        assert!((profile.interpolate().speed - 1.25).abs() < f64::EPSILON);
    }

    #[test]
    fn test_out_of_range_values_clamped() {
        let mut profile = VoiceProfile::default();
        profile.tone = 150.0;
        profile.threshold = -10.0;

        let params = profile.interpolate();
        assert!((params.tone - 20.0).abs() < f64::EPSILON);
        assert!(params.threshold.abs() < f64::EPSILON);
    }

    #[test]
    fn test_tone_and_intone_ranges() {
        let mut profile = VoiceProfile::default();
        profile.tone = 0.0;
        profile.intone = 100.0;

        let params = profile.interpolate();
        assert!((params.tone + 20.0).abs() < f64::EPSILON);
        assert!((params.intone - 4.0).abs() < f64::EPSILON);
    }
}
