use hanabi_core::StageCue;
use web_sys as web;

const MASTER_LEVEL: f32 = 0.3;

// Rising whistle while the shell climbs
const WHIZZ_START_HZ: f32 = 380.0;
const WHIZZ_END_HZ: f32 = 1_450.0;
const WHIZZ_SEC: f64 = 1.1;
const WHIZZ_LEVEL: f32 = 0.12;

// Low filtered thump when the shell opens
const BLOOM_HZ: f32 = 70.0;
const BLOOM_CUTOFF_HZ: f32 = 420.0;
const BLOOM_SEC: f64 = 1.6;
const BLOOM_LEVEL: f32 = 0.5;

/// One-shot synth voices for stage cues, all routed into one master gain.
pub struct CueAudio {
    ctx: web::AudioContext,
    master: web::GainNode,
}

impl CueAudio {
    /// Needs to run inside a user gesture, or the context starts suspended.
    pub fn new() -> anyhow::Result<Self> {
        let ctx = web::AudioContext::new()
            .map_err(|e| anyhow::anyhow!("AudioContext error: {e:?}"))?;
        let master =
            web::GainNode::new(&ctx).map_err(|e| anyhow::anyhow!("GainNode error: {e:?}"))?;
        master.gain().set_value(MASTER_LEVEL);
        master
            .connect_with_audio_node(&ctx.destination())
            .map_err(|e| anyhow::anyhow!("connect error: {e:?}"))?;
        log::info!("[audio] cue voices ready");
        Ok(Self { ctx, master })
    }

    pub fn play(&self, cue: StageCue) {
        match cue {
            StageCue::Whizz => self.whizz(),
            StageCue::Bloom => self.bloom(),
        }
    }

    fn whizz(&self) {
        let Ok(src) = web::OscillatorNode::new(&self.ctx) else {
            return;
        };
        let Ok(g) = web::GainNode::new(&self.ctx) else {
            return;
        };
        src.set_type(web::OscillatorType::Sine);
        let t0 = self.ctx.current_time() + 0.005;
        let _ = src.frequency().set_value_at_time(WHIZZ_START_HZ, t0);
        let _ = src
            .frequency()
            .exponential_ramp_to_value_at_time(WHIZZ_END_HZ, t0 + WHIZZ_SEC);
        g.gain().set_value(0.0);
        let _ = g.gain().linear_ramp_to_value_at_time(WHIZZ_LEVEL, t0 + 0.05);
        let _ = g.gain().linear_ramp_to_value_at_time(0.0, t0 + WHIZZ_SEC);
        let _ = src.connect_with_audio_node(&g);
        let _ = g.connect_with_audio_node(&self.master);
        let _ = src.start_with_when(t0);
        let _ = src.stop_with_when(t0 + WHIZZ_SEC + 0.05);
    }

    fn bloom(&self) {
        let Ok(src) = web::OscillatorNode::new(&self.ctx) else {
            return;
        };
        let Ok(filter) = web::BiquadFilterNode::new(&self.ctx) else {
            return;
        };
        let Ok(g) = web::GainNode::new(&self.ctx) else {
            return;
        };
        src.set_type(web::OscillatorType::Sawtooth);
        src.frequency().set_value(BLOOM_HZ);
        filter.set_type(web::BiquadFilterType::Lowpass);
        filter.frequency().set_value(BLOOM_CUTOFF_HZ);
        let t0 = self.ctx.current_time() + 0.005;
        g.gain().set_value(0.0);
        let _ = g.gain().linear_ramp_to_value_at_time(BLOOM_LEVEL, t0 + 0.01);
        let _ = g.gain().exponential_ramp_to_value_at_time(0.001, t0 + BLOOM_SEC);
        let _ = src.connect_with_audio_node(&filter);
        let _ = filter.connect_with_audio_node(&g);
        let _ = g.connect_with_audio_node(&self.master);
        let _ = src.start_with_when(t0);
        let _ = src.stop_with_when(t0 + BLOOM_SEC + 0.05);
    }
}
