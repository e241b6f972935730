#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::state::{Command, GameStatus};

    #[test]
    fn test_default_is_idle() {
        assert_eq!(GameStatus::default(), GameStatus::Idle);
    }

    #[test]
    fn test_action_starts_from_idle_and_game_over() {
        assert_eq!(GameStatus::Idle.command(None), Command::Start);
        assert_eq!(GameStatus::GameOver.command(None), Command::Start);
        assert_eq!(GameStatus::GameOver.command(Some(true)), Command::Start);
    }

    #[test]
    fn test_action_drops_only_a_swinging_block() {
        assert_eq!(GameStatus::Playing.command(Some(false)), Command::Drop);
        assert_eq!(GameStatus::Playing.command(Some(true)), Command::Ignore);
        assert_eq!(GameStatus::Playing.command(None), Command::Ignore);
    }

    #[test]
    fn test_only_playing_simulates() {
        assert!(GameStatus::Playing.simulates());
        assert!(!GameStatus::Idle.simulates());
        assert!(!GameStatus::GameOver.simulates());
    }
}
