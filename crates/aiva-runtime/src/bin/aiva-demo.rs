//! aiva-demo - speak a line and print the avatar pose per frame

use std::sync::Arc;
use std::time::Duration;

use aiva_core::{AivaError, SpeechEventKind};
use aiva_runtime::{init_logging, AivaConfig, FrameLoop, Speaker, TimedSpeechOutput};
use aiva_visual::{AvatarDescription, BoneDescription, MeshDescription, MouthDriver, RigBinding};
use aiva_voice::VisemeSimulator;
use argh::FromArgs;
use tokio::sync::Notify;
use tracing::{error, info};

const DEFAULT_TEXT: &str = "Merhaba, ben AIVA. Size nasıl yardımcı olabilirim?";

#[derive(FromArgs, Debug)]
/// Drive the AIVA viseme simulator from the command line.
struct Args {
    /// text to speak
    #[argh(option, short = 't')]
    text: Option<String>,

    /// path to a JSON config file
    #[argh(option, short = 'c')]
    config: Option<String>,

    /// frames per second for the pose printout
    #[argh(option, default = "30")]
    fps: u32,
}

/// Stand-in for a loaded avatar: a head mesh and a jaw bone
fn demo_avatar() -> AvatarDescription {
    AvatarDescription {
        meshes: vec![MeshDescription::new("Head")],
        bones: vec![BoneDescription::new("Neck"), BoneDescription::new("Jaw")],
    }
}

#[tokio::main]
async fn main() -> Result<(), AivaError> {
    let args: Args = argh::from_env();

    let mut config = match &args.config {
        Some(path) => AivaConfig::load(path)?,
        None => AivaConfig::default(),
    };
    config.apply_env_overrides()?;
    init_logging(&config.logging);

    if args.fps == 0 {
        return Err(AivaError::InvalidConfig("fps must be positive".into()));
    }

    let simulator = VisemeSimulator::new(config.simulator.to_simulator_config())?;
    let binding = RigBinding::bind(&demo_avatar(), &config.rig)?;
    info!(node = %binding.node_name, drive = ?binding.drive, "avatar bound");

    let output = Arc::new(TimedSpeechOutput::new(config.simulator.tick_period));
    let speaker = Speaker::new(output, simulator.clone(), config.speech.clone());

    let done = Arc::new(Notify::new());
    let notify = Arc::clone(&done);
    let _ended = simulator.subscribe_kind(SpeechEventKind::Ended, move |event| {
        info!(?event, "speech ended");
        notify.notify_one();
    });

    let text = args.text.unwrap_or_else(|| DEFAULT_TEXT.to_string());
    let spoken = speaker.speak(&text).map_err(|e| {
        error!(error = %e, "speak failed");
        e
    })?;
    let Some(utterance) = spoken else {
        info!("nothing to say");
        return Ok(());
    };
    info!(%utterance, %text, "speaking");

    let mut frames = FrameLoop::new(simulator, MouthDriver::new(binding, config.rig.clone()));
    let mut interval = tokio::time::interval(Duration::from_secs(1) / args.fps);

    loop {
        tokio::select! {
            _ = done.notified() => break,
            _ = interval.tick() => {
                let pose = frames.frame();
                let sample = serde_json::to_string(&pose.sample).unwrap_or_default();
                info!(
                    %sample,
                    speaking = pose.speaking,
                    viseme = ?pose.mouth_state.viseme,
                    mouth = ?pose.mouth,
                    head_y = pose.head.position_y,
                    "pose"
                );
            }
        }
    }

    let stats = frames.stats();
    info!(
        frames = stats.frames,
        speaking_frames = stats.speaking_frames,
        simulator = ?speaker.simulator().stats(),
        "done"
    );
    Ok(())
}
