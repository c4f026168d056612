use semantirs_core::error::ModelError;
use semantirs_core::metrics::Meters;
use semantirs_models::device::node::Rsu;
use semantirs_models::net::access::AccessPoints;
use semantirs_models::net::fading::FadingSettings;
use semantirs_models::offload::transmitter::{OffloadSettings, Transmitter};

/// Reference settings with fading switched off.
pub fn without_fading() -> OffloadSettings {
    let mut settings = OffloadSettings::default();
    settings.channel.fading = FadingSettings {
        variant: "none".to_string(),
        ..Default::default()
    };
    settings
}

/// Settings that pin the serving distance to `distance` for any vehicle position.
pub fn fixed_distance(mut settings: OffloadSettings, distance: f64) -> OffloadSettings {
    settings.transmission.min_distance = Meters::new(distance);
    settings.transmission.max_distance = Meters::new(distance);
    settings
}

pub fn make_transmitter(
    settings: &OffloadSettings,
    rsus: &[Rsu],
    seed: u64,
) -> Result<Transmitter, ModelError> {
    let access = AccessPoints::new(rsus)?;
    Transmitter::with_settings(settings, access, seed)
}
