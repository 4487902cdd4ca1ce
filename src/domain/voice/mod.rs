//! Voice Context - 朗读音色
//!
//! 用户可见的设定是 0~100 的百分比，合成引擎使用各自的原生区间，
//! 两者之间通过线性插值映射。

mod profile;

pub use profile::{clamp, lerp, SynthesisParams, VoiceKind, VoiceProfile};
