//! The eight resize handles and pointer classification against them.

use eframe::egui;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Handle {
    NorthWest,
    North,
    NorthEast,
    East,
    SouthEast,
    South,
    SouthWest,
    West,
}

impl Handle {
    /// Hit-test order; the first handle whose region contains the pointer wins.
    pub const ALL: [Handle; 8] = [
        Handle::NorthWest,
        Handle::North,
        Handle::NorthEast,
        Handle::East,
        Handle::SouthEast,
        Handle::South,
        Handle::SouthWest,
        Handle::West,
    ];

    pub fn moves_left(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::SouthWest | Handle::West)
    }

    pub fn moves_right(self) -> bool {
        matches!(self, Handle::NorthEast | Handle::SouthEast | Handle::East)
    }

    pub fn moves_top(self) -> bool {
        matches!(self, Handle::NorthWest | Handle::North | Handle::NorthEast)
    }

    pub fn moves_bottom(self) -> bool {
        matches!(self, Handle::SouthWest | Handle::South | Handle::SouthEast)
    }

    pub fn is_corner(self) -> bool {
        (self.moves_left() || self.moves_right()) && (self.moves_top() || self.moves_bottom())
    }

    /// Anchor point of the handle on a display-space rectangle.
    pub fn anchor(self, rect: egui::Rect) -> egui::Pos2 {
        match self {
            Handle::NorthWest => rect.left_top(),
            Handle::North => rect.center_top(),
            Handle::NorthEast => rect.right_top(),
            Handle::East => rect.right_center(),
            Handle::SouthEast => rect.right_bottom(),
            Handle::South => rect.center_bottom(),
            Handle::SouthWest => rect.left_bottom(),
            Handle::West => rect.left_center(),
        }
    }

    pub fn cursor(self) -> egui::CursorIcon {
        match self {
            Handle::NorthWest | Handle::SouthEast => egui::CursorIcon::ResizeNwSe,
            Handle::NorthEast | Handle::SouthWest => egui::CursorIcon::ResizeNeSw,
            Handle::East | Handle::West => egui::CursorIcon::ResizeHorizontal,
            Handle::North | Handle::South => egui::CursorIcon::ResizeVertical,
        }
    }
}

impl std::fmt::Display for Handle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Handle::NorthWest => "nw",
            Handle::North => "n",
            Handle::NorthEast => "ne",
            Handle::East => "e",
            Handle::SouthEast => "se",
            Handle::South => "s",
            Handle::SouthWest => "sw",
            Handle::West => "w",
        };
        write!(f, "{}", s)
    }
}

/// What a pointer-down at a given position would start.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Hit {
    Resize(Handle),
    Move,
    Create,
}

impl Hit {
    pub fn hover_cursor(self) -> egui::CursorIcon {
        match self {
            Hit::Resize(handle) => handle.cursor(),
            Hit::Move => egui::CursorIcon::Grab,
            Hit::Create => egui::CursorIcon::Crosshair,
        }
    }
}

/// Classifies a display-space point against a display-space selection.
///
/// Handles are checked before the interior, so near the minimum size, where
/// handle regions cover most of the selection, a press still resizes.
pub fn hit_test(pos: egui::Pos2, rect: egui::Rect, hit_size: f32) -> Hit {
    let half = hit_size / 2.0;
    for handle in Handle::ALL {
        let anchor = handle.anchor(rect);
        if (pos.x - anchor.x).abs() <= half && (pos.y - anchor.y).abs() <= half {
            return Hit::Resize(handle);
        }
    }

    if rect.contains(pos) {
        Hit::Move
    } else {
        Hit::Create
    }
}
