#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::commentary::{Commentator, Phrasebook, Verdict};
    use crate::components::Decoration;
    use crate::simulation::Simulation;
    use crate::sound::AudioState;
    use crate::state::GameStatus;
    use crate::systems::CommentaryPolicy;
    use crate::tests::test_utils::{app_drop_at, create_test_app, create_test_app_with};
    use std::sync::Arc;
    use std::thread;
    use std::time::{Duration, Instant};

    fn foundation_x(app: &crate::app::App) -> f64 {
        app.simulation().tower()[0].x
    }

    // Ticks until the latest comment has the wanted verdict
    fn wait_for_verdict(app: &mut crate::app::App, verdict: Verdict) -> bool {
        let deadline = Instant::now() + Duration::from_secs(5);
        while Instant::now() < deadline {
            app.on_tick();
            let latest = app
                .world
                .resource::<Commentator>()
                .latest()
                .map(|comment| comment.verdict);
            if latest == Some(verdict) {
                return true;
            }
            thread::sleep(Duration::from_millis(5));
        }
        false
    }

    #[test]
    fn test_app_creation() {
        let mut app = create_test_app();
        assert!(!app.should_quit);
        assert_eq!(app.simulation().status(), GameStatus::Idle);
        assert_eq!(app.best_score(), 0);

        let decorations = app.world.query::<&Decoration>().iter(&app.world).count();
        assert_eq!(decorations, 4);
    }

    #[test]
    fn test_press_starts_then_drops() {
        let mut app = create_test_app();
        app.press();
        app.on_tick();
        assert_eq!(app.simulation().status(), GameStatus::Playing);

        app.press();
        app.on_tick();
        assert!(app.simulation().active().unwrap().is_falling);
    }

    #[test]
    fn test_toggle_mute() {
        let mut app = create_test_app();
        app.toggle_mute();
        app.on_tick();
        assert!(!app.world.resource::<AudioState>().is_sound_enabled());
        app.toggle_mute();
        app.on_tick();
        assert!(app.world.resource::<AudioState>().is_sound_enabled());
    }

    #[test]
    fn test_full_session_updates_best_score() {
        let mut app = create_test_app();
        app.press();
        app.on_tick();

        let x = foundation_x(&app);
        app_drop_at(&mut app, x);
        app_drop_at(&mut app, x);
        assert_eq!(app.simulation().score(), 3);

        app_drop_at(&mut app, x + 300.0);
        assert_eq!(app.simulation().status(), GameStatus::GameOver);
        assert_eq!(app.best_score(), 3);

        // A worse second session keeps the record
        app.press();
        app.on_tick();
        let fx = foundation_x(&app);
        app_drop_at(&mut app, fx - 300.0);
        assert_eq!(app.simulation().status(), GameStatus::GameOver);
        assert_eq!(app.best_score(), 3);
    }

    #[test]
    fn test_commentary_follows_the_session() {
        let policy = CommentaryPolicy {
            progress_every: 1,
            last_milestone: 0,
        };
        let commentator = Commentator::new(Arc::new(Phrasebook), Duration::from_secs(2));
        let mut app = create_test_app_with(commentator, policy);

        app.press();
        app.on_tick();
        let x = foundation_x(&app);
        app_drop_at(&mut app, x);
        assert!(wait_for_verdict(&mut app, Verdict::Progress));

        app_drop_at(&mut app, x + 300.0);
        assert!(wait_for_verdict(&mut app, Verdict::Win));

        // Restarting clears the old comment
        app.press();
        app.on_tick();
        assert!(app.world.resource::<Commentator>().latest().is_none());
    }

    #[test]
    fn test_losing_without_record_is_a_fail() {
        let commentator = Commentator::new(Arc::new(Phrasebook), Duration::from_secs(2));
        let mut app = create_test_app_with(commentator, CommentaryPolicy::default());

        app.press();
        app.on_tick();
        let fx = foundation_x(&app);
        app_drop_at(&mut app, fx + 300.0);
        assert_eq!(app.simulation().status(), GameStatus::GameOver);
        assert!(wait_for_verdict(&mut app, Verdict::Fail));
    }

    #[test]
    fn test_idle_app_keeps_simulation_still() {
        let mut app = create_test_app();
        for _ in 0..30 {
            app.on_tick();
        }
        let simulation = app.world.resource::<Simulation>();
        assert_eq!(simulation.status(), GameStatus::Idle);
        assert!(simulation.tower().is_empty());
    }
}
