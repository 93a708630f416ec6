//! Mood to music-attribute mappings.

use super::Intent;
use crate::mood_store::MoodLevel;

/// Target audio features for a recommendation request.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AudioTargets {
    /// 0.0 = sad/dark, 1.0 = happy/bright.
    pub valence: f64,
    pub energy: f64,
    /// Inclusive BPM range.
    pub tempo: (u32, u32),
}

/// Audio-feature targets per mood and intent. "Improve" pulls toward
/// brighter, more energetic music than the mood itself; "relate" stays
/// close to it.
pub fn audio_targets(level: MoodLevel, intent: Intent) -> AudioTargets {
    use Intent::*;
    use MoodLevel::*;
    match (level, intent) {
        (Happy, Improve) => AudioTargets { valence: 0.8, energy: 0.8, tempo: (120, 140) },
        (Happy, Relate) => AudioTargets { valence: 0.7, energy: 0.7, tempo: (110, 130) },
        (Calm, Improve) => AudioTargets { valence: 0.6, energy: 0.4, tempo: (70, 100) },
        (Calm, Relate) => AudioTargets { valence: 0.5, energy: 0.3, tempo: (60, 90) },
        (Neutral, Improve) => AudioTargets { valence: 0.6, energy: 0.6, tempo: (90, 120) },
        (Neutral, Relate) => AudioTargets { valence: 0.5, energy: 0.5, tempo: (80, 110) },
        (Tense, Improve) => AudioTargets { valence: 0.7, energy: 0.4, tempo: (70, 100) },
        (Tense, Relate) => AudioTargets { valence: 0.3, energy: 0.6, tempo: (90, 120) },
        (Upset, Improve) => AudioTargets { valence: 0.8, energy: 0.5, tempo: (85, 110) },
        (Upset, Relate) => AudioTargets { valence: 0.2, energy: 0.4, tempo: (60, 90) },
    }
}

/// Genre search terms per mood, for providers without tunable audio
/// features.
pub fn genre_terms(level: MoodLevel) -> &'static [&'static str] {
    match level {
        MoodLevel::Happy => &["pop", "dance"],
        MoodLevel::Calm => &["ambient", "classical"],
        MoodLevel::Neutral => &["pop", "rock"],
        MoodLevel::Tense => &["alternative", "rock"],
        MoodLevel::Upset => &["blues", "alternative"],
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mood_and_intent_has_targets() {
        for level in MoodLevel::ALL {
            for intent in [Intent::Improve, Intent::Relate] {
                let targets = audio_targets(level, intent);
                assert!((0.0..=1.0).contains(&targets.valence));
                assert!((0.0..=1.0).contains(&targets.energy));
                assert!(targets.tempo.0 < targets.tempo.1);
            }
            assert!(!genre_terms(level).is_empty());
        }
    }

    #[test]
    fn improve_never_darker_than_relate() {
        for level in MoodLevel::ALL {
            let improve = audio_targets(level, Intent::Improve);
            let relate = audio_targets(level, Intent::Relate);
            assert!(improve.valence >= relate.valence);
        }
    }
}
