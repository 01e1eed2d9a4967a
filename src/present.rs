//! Presentation and sound collaborators
//!
//! The game core only produces [`GameEvent`]s. [`dispatch`] turns them into
//! calls on a [`Presenter`] (DOM, console, test recorder) and a
//! [`SoundPlayer`]. Sound is best-effort: failures are logged and dropped.

use thiserror::Error;

use crate::game::{GameEvent, IconKind, SpawnedIcon};

/// Sound effect types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Sound {
    /// Water can collected
    Collectible,
    /// Bonus time grabbed
    Bonus,
    /// Biohazard clicked
    Hazard,
    /// New record
    HighScore,
}

impl From<IconKind> for Sound {
    fn from(kind: IconKind) -> Self {
        match kind {
            IconKind::Collectible => Sound::Collectible,
            IconKind::Bonus => Sound::Bonus,
            IconKind::Hazard => Sound::Hazard,
        }
    }
}

/// Audio playback failures
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AudioError {
    #[error("audio output is not available")]
    Unavailable,
    #[error("failed to build {0:?} sound")]
    Synthesis(Sound),
}

/// Everything the view must be able to show
pub trait Presenter {
    fn render_icon(&mut self, icon: &SpawnedIcon);
    fn remove_icon(&mut self, cell: usize);
    fn clear_grid(&mut self);
    fn update_score(&mut self, score: u32);
    fn update_timer(&mut self, seconds: u32);
    fn update_high_score(&mut self, score: u32);
    fn show_round_over(&mut self, final_score: u32, is_new_high_score: bool);
    fn hide_round_over(&mut self);
    fn show_difficulty_choice(&mut self);
    fn hide_difficulty_choice(&mut self);
    fn show_milestone(&mut self, message: &str);
    fn celebrate(&mut self);
}

/// Plays short effects
pub trait SoundPlayer {
    fn play_sound(&mut self, sound: Sound) -> Result<(), AudioError>;
}

/// A player that stays silent (native builds, muted sessions)
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl SoundPlayer for Silent {
    fn play_sound(&mut self, _sound: Sound) -> Result<(), AudioError> {
        Ok(())
    }
}

/// Forward a batch of events to the collaborators
pub fn dispatch<P, A>(events: impl IntoIterator<Item = GameEvent>, view: &mut P, audio: &mut A)
where
    P: Presenter + ?Sized,
    A: SoundPlayer + ?Sized,
{
    for event in events {
        match event {
            GameEvent::DifficultyPrompt => view.show_difficulty_choice(),
            GameEvent::RoundStarted { .. } => {
                view.hide_difficulty_choice();
                view.hide_round_over();
            }
            GameEvent::IconSpawned(icon) => view.render_icon(&icon),
            GameEvent::IconRemoved { cell, .. } => view.remove_icon(cell),
            GameEvent::GridCleared => view.clear_grid(),
            GameEvent::IconClicked { kind, .. } => play(audio, Sound::from(kind)),
            GameEvent::ScoreChanged(score) => view.update_score(score),
            GameEvent::TimeChanged(seconds) => view.update_timer(seconds),
            GameEvent::HighScoreChanged(score) => view.update_high_score(score),
            GameEvent::Milestone(message) => view.show_milestone(message),
            GameEvent::RoundOver {
                final_score,
                new_high_score,
            } => view.show_round_over(final_score, new_high_score),
            GameEvent::RoundOverDismissed => view.hide_round_over(),
            GameEvent::DifficultyDismissed => view.hide_difficulty_choice(),
            GameEvent::Celebrate => {
                play(audio, Sound::HighScore);
                view.celebrate();
            }
        }
    }
}

fn play<A: SoundPlayer + ?Sized>(audio: &mut A, sound: Sound) {
    if let Err(e) = audio.play_sound(sound) {
        log::debug!("Sound skipped: {}", e);
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::consts::HIGH_SCORE_KEY;
    use crate::difficulty::Difficulty;
    use crate::game::{IconId, RoundController};
    use crate::platform::MemoryStore;

    /// Records every presenter call as a string
    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl Presenter for Recorder {
        fn render_icon(&mut self, icon: &SpawnedIcon) {
            self.calls
                .push(format!("render {} {}", icon.kind.as_str(), icon.cell));
        }
        fn remove_icon(&mut self, cell: usize) {
            self.calls.push(format!("remove {}", cell));
        }
        fn clear_grid(&mut self) {
            self.calls.push("clear".into());
        }
        fn update_score(&mut self, score: u32) {
            self.calls.push(format!("score {}", score));
        }
        fn update_timer(&mut self, seconds: u32) {
            self.calls.push(format!("timer {}", seconds));
        }
        fn update_high_score(&mut self, score: u32) {
            self.calls.push(format!("high {}", score));
        }
        fn show_round_over(&mut self, final_score: u32, is_new_high_score: bool) {
            self.calls
                .push(format!("over {} {}", final_score, is_new_high_score));
        }
        fn hide_round_over(&mut self) {
            self.calls.push("hide over".into());
        }
        fn show_difficulty_choice(&mut self) {
            self.calls.push("difficulty".into());
        }
        fn hide_difficulty_choice(&mut self) {
            self.calls.push("hide difficulty".into());
        }
        fn show_milestone(&mut self, message: &str) {
            self.calls.push(format!("milestone {}", message));
        }
        fn celebrate(&mut self) {
            self.calls.push("confetti".into());
        }
    }

    /// Fails every other call
    #[derive(Default)]
    struct FlakySpeaker {
        played: Vec<Sound>,
        attempts: usize,
    }

    impl SoundPlayer for FlakySpeaker {
        fn play_sound(&mut self, sound: Sound) -> Result<(), AudioError> {
            self.attempts += 1;
            if self.attempts % 2 == 0 {
                return Err(AudioError::Synthesis(sound));
            }
            self.played.push(sound);
            Ok(())
        }
    }

    #[test]
    fn test_dispatch_maps_events() {
        let icon = SpawnedIcon {
            id: IconId(4),
            kind: IconKind::Bonus,
            cell: 7,
            created_at_ms: 0,
            clicked: false,
        };
        let events = vec![
            GameEvent::DifficultyPrompt,
            GameEvent::RoundStarted {
                difficulty: Difficulty::Easy,
            },
            GameEvent::IconSpawned(icon),
            GameEvent::IconClicked {
                id: icon.id,
                kind: icon.kind,
                cell: icon.cell,
            },
            GameEvent::TimeChanged(37),
            GameEvent::IconRemoved {
                id: icon.id,
                cell: icon.cell,
            },
            GameEvent::Milestone("hi"),
            GameEvent::HighScoreChanged(5),
            GameEvent::Celebrate,
            GameEvent::RoundOver {
                final_score: 5,
                new_high_score: true,
            },
        ];
        let mut view = Recorder::default();
        let mut audio = FlakySpeaker::default();
        dispatch(events, &mut view, &mut audio);

        assert_eq!(
            view.calls,
            vec![
                "difficulty",
                "hide difficulty",
                "hide over",
                "render bonus 7",
                "timer 37",
                "remove 7",
                "milestone hi",
                "high 5",
                "confetti",
                "over 5 true",
            ]
        );
        // Second sound failed but dispatch kept going
        assert_eq!(audio.attempts, 2);
        assert_eq!(audio.played, vec![Sound::Bonus]);
    }

    #[test]
    fn test_reset_from_dialog_hides_it() {
        let mut game = RoundController::new(1, MemoryStore::new());
        let mut view = Recorder::default();
        game.request_start();
        game.reset_current();
        dispatch(game.drain_events(), &mut view, &mut Silent);

        let shown = view.calls.iter().position(|c| c == "difficulty");
        let hidden = view.calls.iter().rposition(|c| c == "hide difficulty");
        assert!(shown.is_some());
        assert!(hidden > shown);
    }

    #[test]
    fn test_full_round_through_dispatch() {
        let store = MemoryStore::new().with_entry(HIGH_SCORE_KEY, "not a number");
        let mut game = RoundController::new(1, store);
        let mut view = Recorder::default();
        let mut audio = Silent;

        game.request_start();
        game.choose_difficulty(Difficulty::Hard);
        for _ in 0..100 {
            game.advance(Duration::from_millis(250));
            if let Some(icon) = game.active_icon().copied() {
                if icon.kind == IconKind::Collectible {
                    game.click(icon.id);
                }
            }
            dispatch(game.drain_events(), &mut view, &mut audio);
        }

        assert_eq!(view.calls.first().map(String::as_str), Some("high 0"));
        let over = format!("over {} {}", game.score(), game.score() > 0);
        assert!(view.calls.contains(&over), "missing {over}");
        assert_eq!(
            view.calls.iter().filter(|c| *c == "confetti").count(),
            usize::from(game.score() > 0)
        );
    }
}
