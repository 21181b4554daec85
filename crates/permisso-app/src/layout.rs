//! Where the presented surface and overlays sit inside the window.

use permisso_common::PresentationStyle;

/// Logical-pixel rectangle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Frame {
    pub fn to_wry(self) -> wry::Rect {
        wry::Rect {
            position: wry::dpi::Position::Logical(wry::dpi::LogicalPosition::new(self.x, self.y)),
            size: wry::dpi::Size::Logical(wry::dpi::LogicalSize::new(self.width, self.height)),
        }
    }
}

/// Gap left above a page sheet.
const SHEET_TOP_INSET: f64 = 40.0;
/// Margin around an overlay browser.
const OVERLAY_MARGIN: f64 = 24.0;

pub fn surface_frame(style: PresentationStyle, width: f64, height: f64) -> Frame {
    match style {
        PresentationStyle::FullScreen
        | PresentationStyle::OverFullScreen
        | PresentationStyle::Automatic => Frame {
            x: 0.0,
            y: 0.0,
            width,
            height,
        },
        PresentationStyle::PageSheet => Frame {
            x: 0.0,
            y: SHEET_TOP_INSET.min(height),
            width,
            height: (height - SHEET_TOP_INSET).max(0.0),
        },
        PresentationStyle::FormSheet => {
            let w = (width * 0.7).round();
            let h = (height * 0.8).round();
            Frame {
                x: ((width - w) / 2.0).round(),
                y: ((height - h) / 2.0).round(),
                width: w,
                height: h,
            }
        }
    }
}

pub fn overlay_frame(width: f64, height: f64) -> Frame {
    Frame {
        x: OVERLAY_MARGIN.min(width / 2.0),
        y: OVERLAY_MARGIN.min(height / 2.0),
        width: (width - 2.0 * OVERLAY_MARGIN).max(0.0),
        height: (height - 2.0 * OVERLAY_MARGIN).max(0.0),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_screen_covers_the_window() {
        let frame = surface_frame(PresentationStyle::FullScreen, 800.0, 600.0);
        assert_eq!(
            frame,
            Frame {
                x: 0.0,
                y: 0.0,
                width: 800.0,
                height: 600.0
            }
        );
    }

    #[test]
    fn form_sheet_is_centered() {
        let frame = surface_frame(PresentationStyle::FormSheet, 1000.0, 500.0);
        assert_eq!(frame.width, 700.0);
        assert_eq!(frame.height, 400.0);
        assert_eq!(frame.x, 150.0);
        assert_eq!(frame.y, 50.0);
    }

    #[test]
    fn page_sheet_never_goes_negative() {
        let frame = surface_frame(PresentationStyle::PageSheet, 300.0, 10.0);
        assert_eq!(frame.y, 10.0);
        assert_eq!(frame.height, 0.0);
    }

    #[test]
    fn overlay_is_inset() {
        let frame = overlay_frame(800.0, 600.0);
        assert_eq!(frame.x, 24.0);
        assert_eq!(frame.width, 752.0);
        assert_eq!(frame.height, 552.0);
    }

    #[test]
    fn frame_converts_to_logical_wry_rect() {
        let rect = Frame {
            x: 1.0,
            y: 2.0,
            width: 3.0,
            height: 4.0,
        }
        .to_wry();
        match rect.position {
            wry::dpi::Position::Logical(pos) => {
                assert!((pos.x - 1.0).abs() < f64::EPSILON);
                assert!((pos.y - 2.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected logical position"),
        }
        match rect.size {
            wry::dpi::Size::Logical(size) => {
                assert!((size.width - 3.0).abs() < f64::EPSILON);
                assert!((size.height - 4.0).abs() < f64::EPSILON);
            }
            _ => panic!("Expected logical size"),
        }
    }
}
