mod live;
mod reply;
mod sampler;

#[cfg(test)]
mod tests;

pub use live::{LiveSession, GREETING};
pub use reply::{parse_reply, CannedReplyService, HttpReplyService};
pub use sampler::{EmotionSampler, FixedDetector, SamplerHandle, ScriptedDetector};
