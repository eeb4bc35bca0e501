//! World-space placement of cells and animated character poses.

use glam::Vec3;
use std::f32::consts::PI;
use tilewalk_core::{CellCoord, VisualHint};

/// Maps grid coordinates onto world-space positions.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BoardLayout {
    tile_spacing: f32,
    height_offset: f32,
    jump_height: f32,
}

impl BoardLayout {
    /// Creates a layout with the provided spacing, character height offset and jump apex.
    #[must_use]
    pub const fn new(tile_spacing: f32, height_offset: f32, jump_height: f32) -> Self {
        Self {
            tile_spacing,
            height_offset,
            jump_height,
        }
    }

    /// Distance between neighbouring cell centres.
    #[must_use]
    pub const fn tile_spacing(&self) -> f32 {
        self.tile_spacing
    }

    /// Height the character floats above the tile surface.
    #[must_use]
    pub const fn height_offset(&self) -> f32 {
        self.height_offset
    }

    /// Peak height added at the middle of a jump.
    #[must_use]
    pub const fn jump_height(&self) -> f32 {
        self.jump_height
    }

    /// Centre of a tile on the ground plane.
    #[must_use]
    pub fn tile_position(&self, cell: CellCoord) -> Vec3 {
        Vec3::new(
            cell.x() as f32 * self.tile_spacing,
            0.0,
            cell.y() as f32 * self.tile_spacing,
        )
    }

    /// Resting position of the character standing on `cell`.
    #[must_use]
    pub fn character_position(&self, cell: CellCoord) -> Vec3 {
        self.tile_position(cell) + Vec3::Y * self.height_offset
    }

    /// Samples the character pose for a hop at `progress` in `[0, 1]`.
    ///
    /// Plain moves interpolate linearly. Jumps follow a sine arc peaking at
    /// [`BoardLayout::jump_height`]. Teleports shrink to nothing at the origin
    /// during the first half and grow back at the destination in the second.
    #[must_use]
    pub fn sample_character(
        &self,
        hint: VisualHint,
        from: CellCoord,
        to: CellCoord,
        progress: f32,
    ) -> CharacterPose {
        let t = progress.clamp(0.0, 1.0);
        let start = self.character_position(from);
        let end = self.character_position(to);
        match hint {
            VisualHint::Default => CharacterPose::new(start.lerp(end, t), 1.0),
            VisualHint::Jump => {
                let arc = (t * PI).sin() * self.jump_height;
                CharacterPose::new(start.lerp(end, t) + Vec3::Y * arc, 1.0)
            }
            VisualHint::Teleport => {
                if t < 0.5 {
                    CharacterPose::new(start, 1.0 - t * 2.0)
                } else {
                    CharacterPose::new(end, (t - 0.5) * 2.0)
                }
            }
        }
    }

    /// Samples a sliding tile position with smoothstep easing.
    #[must_use]
    pub fn sample_slide(&self, from: CellCoord, to: CellCoord, progress: f32) -> Vec3 {
        let t = progress.clamp(0.0, 1.0);
        let eased = t * t * (3.0 - 2.0 * t);
        self.tile_position(from).lerp(self.tile_position(to), eased)
    }
}

impl Default for BoardLayout {
    fn default() -> Self {
        Self::new(1.0, 0.5, 1.0)
    }
}

/// World-space position and uniform scale of the character.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CharacterPose {
    /// Character position.
    pub position: Vec3,
    /// Uniform scale where `1.0` is the natural size.
    pub scale: f32,
}

impl CharacterPose {
    /// Creates a new pose.
    #[must_use]
    pub const fn new(position: Vec3, scale: f32) -> Self {
        Self { position, scale }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-4
    }

    #[test]
    fn cells_map_onto_the_ground_plane() {
        let layout = BoardLayout::new(2.0, 0.5, 1.0);
        assert_eq!(
            layout.tile_position(CellCoord::new(3, -1)),
            Vec3::new(6.0, 0.0, -2.0)
        );
        assert_eq!(
            layout.character_position(CellCoord::new(0, 0)),
            Vec3::new(0.0, 0.5, 0.0)
        );
    }

    #[test]
    fn plain_move_interpolates_linearly() {
        let layout = BoardLayout::default();
        let pose = layout.sample_character(
            VisualHint::Default,
            CellCoord::new(0, 0),
            CellCoord::new(2, 0),
            0.25,
        );
        assert!(close(pose.position, Vec3::new(0.5, 0.5, 0.0)));
        assert_eq!(pose.scale, 1.0);
    }

    #[test]
    fn jump_peaks_halfway_and_lands_on_target() {
        let layout = BoardLayout::default();
        let from = CellCoord::new(0, 0);
        let to = CellCoord::new(3, 0);

        let apex = layout.sample_character(VisualHint::Jump, from, to, 0.5);
        assert!(close(apex.position, Vec3::new(1.5, 1.5, 0.0)));

        let landed = layout.sample_character(VisualHint::Jump, from, to, 1.0);
        assert!(close(landed.position, layout.character_position(to)));
    }

    #[test]
    fn teleport_shrinks_then_reappears_at_destination() {
        let layout = BoardLayout::default();
        let from = CellCoord::new(0, 0);
        let to = CellCoord::new(4, 4);

        let leaving = layout.sample_character(VisualHint::Teleport, from, to, 0.25);
        assert!(close(leaving.position, layout.character_position(from)));
        assert!((leaving.scale - 0.5).abs() < 1e-4);

        let arriving = layout.sample_character(VisualHint::Teleport, from, to, 0.75);
        assert!(close(arriving.position, layout.character_position(to)));
        assert!((arriving.scale - 0.5).abs() < 1e-4);
    }

    #[test]
    fn slide_eases_in_and_out() {
        let layout = BoardLayout::default();
        let from = CellCoord::new(0, 0);
        let to = CellCoord::new(1, 0);

        let early = layout.sample_slide(from, to, 0.1);
        assert!(early.x < 0.1, "smoothstep starts slower than linear");
        assert!(close(layout.sample_slide(from, to, 0.5), Vec3::new(0.5, 0.0, 0.0)));
        assert!(close(layout.sample_slide(from, to, 2.0), layout.tile_position(to)));
    }
}
