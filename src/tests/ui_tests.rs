#![warn(clippy::all, clippy::pedantic)]

#[cfg(test)]
mod tests {
    use crate::state::GameStatus;
    use crate::tests::test_utils::{app_drop_at, create_test_app};
    use crate::ui::{self, Viewport, calculate_playfield_size, centered_rect};
    use ratatui::{backend::TestBackend, layout::Rect, prelude::*};

    // Helper function to create a test terminal
    fn create_test_terminal(width: u16, height: u16) -> Terminal<TestBackend> {
        let backend = TestBackend::new(width, height);
        Terminal::new(backend).unwrap()
    }

    // Whole screen as one string, row by row
    fn screen_text(terminal: &Terminal<TestBackend>) -> String {
        let buffer = terminal.backend().buffer();
        let mut text = String::new();
        for y in 0..buffer.area.height {
            for x in 0..buffer.area.width {
                text.push_str(buffer[(x, y)].symbol());
            }
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_centered_rect() {
        let area = Rect::new(0, 0, 100, 100);
        let centered = centered_rect(50, 40, area);

        assert_eq!(centered.width, 50);
        assert_eq!(centered.height, 40);
        assert_eq!(centered.x, 25);
        assert_eq!(centered.y, 30);
    }

    #[test]
    fn test_calculate_playfield_size() {
        let (width, height) = calculate_playfield_size(Rect::new(0, 0, 100, 40));
        assert_eq!(height, 40);
        assert_eq!(width, 49);

        // Narrow terminals give the info panel its share first
        let (narrow, _) = calculate_playfield_size(Rect::new(0, 0, 50, 40));
        assert_eq!(narrow, 24);
    }

    #[test]
    fn test_viewport_projection() {
        let viewport = Viewport {
            area: Rect::new(2, 1, 40, 65),
            offset_x: 0.0,
            offset_y: 0.0,
        };
        assert_eq!(viewport.to_cell(0.0, 0.0), Some((2, 1)));
        assert_eq!(viewport.to_cell(200.0, 325.0), Some((22, 33)));
        assert_eq!(viewport.to_cell(400.0, 0.0), None);
        assert_eq!(viewport.to_cell(-1.0, 0.0), None);

        // Scrolling the camera brings higher blocks into view
        let scrolled = Viewport {
            offset_y: 50.0,
            ..viewport
        };
        assert_eq!(scrolled.to_cell(0.0, -50.0), Some((2, 1)));
        assert_eq!(viewport.to_cell(0.0, -50.0), None);
    }

    #[test]
    fn test_viewport_span_covers_block() {
        let viewport = Viewport {
            area: Rect::new(0, 0, 40, 65),
            offset_x: 0.0,
            offset_y: 0.0,
        };
        let span = viewport.span(125.0, 555.0, 150.0, 50.0).unwrap();
        assert_eq!(span, Rect::new(12, 55, 16, 6));

        // A sliver still covers one cell
        let sliver = viewport.span(121.0, 560.0, 2.0, 50.0).unwrap();
        assert_eq!(sliver.width, 1);

        assert!(viewport.span(500.0, 0.0, 10.0, 10.0).is_none());
    }

    #[test]
    fn test_render_idle_screen() {
        let mut terminal = create_test_terminal(100, 40);
        let mut app = create_test_app();

        terminal.draw(|f| ui::render(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("TOWER BUILDER"));
        assert!(text.contains("Press Space to start building"));
        assert!(text.contains("Score: 0"));
    }

    #[test]
    fn test_render_playing_screen() {
        let mut terminal = create_test_terminal(100, 40);
        let mut app = create_test_app();
        app.press();
        app.on_tick();
        let x = app.simulation().tower()[0].x;
        app_drop_at(&mut app, x);
        app_drop_at(&mut app, x);

        terminal.draw(|f| ui::render(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("Score: 3"));
        assert!(text.contains("Perfect x2"));
        assert!(!text.contains("Press Space to start building"));
        // Hook above the swinging block
        assert!(text.contains('┴'));
    }

    #[test]
    fn test_render_game_over_screen() {
        let mut terminal = create_test_terminal(100, 40);
        let mut app = create_test_app();
        app.press();
        app.on_tick();
        let x = app.simulation().tower()[0].x;
        app_drop_at(&mut app, x);
        app_drop_at(&mut app, x + 300.0);
        assert_eq!(app.simulation().status(), GameStatus::GameOver);

        terminal.draw(|f| ui::render(f, &mut app)).unwrap();

        let text = screen_text(&terminal);
        assert!(text.contains("THE TOWER COLLAPSED!"));
        assert!(text.contains("NEW RECORD"));
        assert!(text.contains("Best: 1"));
    }

    #[test]
    fn test_render_small_terminal() {
        let mut terminal = create_test_terminal(60, 12);
        let mut app = create_test_app();

        terminal.draw(|f| ui::render(f, &mut app)).unwrap();

        assert!(screen_text(&terminal).contains("Terminal too small!"));
    }
}
