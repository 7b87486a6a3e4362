use ratatui::layout::Rect;

/// Center a `width` x `height` rect inside `container`, shrinking to fit.
pub fn centered_in(container: Rect, width: u16, height: u16) -> Rect {
    let w = width.min(container.width);
    let h = height.min(container.height);
    Rect::new(
        container.x + (container.width - w) / 2,
        container.y + (container.height - h) / 2,
        w,
        h,
    )
}

/// Center a rect sized as a percentage of `container` inside it.
pub fn centered_percent(container: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let width = container.width * percent_x / 100;
    let height = (container.height * percent_y / 100).max(5).min(container.height);
    centered_in(container, width, height)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_in_is_centered_and_clamped() {
        let container = Rect::new(10, 5, 100, 40);
        let rect = centered_in(container, 20, 10);
        assert_eq!(rect, Rect::new(50, 20, 20, 10));

        // oversized requests shrink to the container
        let rect = centered_in(container, 500, 500);
        assert_eq!(rect, container);
    }
}
