//! Frame-by-frame animation playback driven by model ticks.

use crate::sprites::sheet::Sheet;

/// Plays a [`Sheet`] by following each frame's duration and `next` link.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AnimPlayer {
    /// Current frame within the sheet.
    pub frame: usize,
    /// Ticks spent on the current frame. -1 right after a reset.
    pub elapsed: i32,
}

impl Default for AnimPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimPlayer {
    /// A player that shows frame 0 from the first [`AnimPlayer::advance`].
    pub fn new() -> Self {
        Self {
            frame: 0,
            elapsed: -1,
        }
    }

    /// Start again from frame 0.
    ///
    /// `elapsed` becomes -1 so the next advance lands on frame 0 with zero
    /// ticks spent rather than skipping past it.
    pub fn reset(&mut self) {
        self.frame = 0;
        self.elapsed = -1;
    }

    /// True once a one-shot animation has moved past its last frame.
    pub fn finished(&self, sheet: &Sheet) -> bool {
        self.frame >= sheet.frame_count()
    }

    /// Advance one model tick. Returns true if the frame changed.
    pub fn advance(&mut self, sheet: &Sheet) -> bool {
        self.elapsed += 1;
        let Some(info) = sheet.frame_info(self.frame) else {
            return false;
        };
        if info.duration < 0 || self.elapsed < info.duration.max(1) {
            return false;
        }
        self.elapsed = 0;
        let changed = self.frame != info.next;
        self.frame = info.next;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sprites::sheet::{basic_frame_infos, one_shot_frame_infos, FrameInfo, Playback};
    use glam::IVec2;

    fn sheet(frames: Vec<FrameInfo>, playback: Playback) -> Sheet {
        Sheet {
            key: "s".into(),
            columns: 0,
            frame_size: IVec2::new(4, 4),
            frames,
            playback,
        }
    }

    fn frames_seen(player: &mut AnimPlayer, sheet: &Sheet, ticks: usize) -> Vec<usize> {
        (0..ticks)
            .map(|_| {
                player.advance(sheet);
                player.frame
            })
            .collect()
    }

    #[test]
    fn test_first_advance_lands_on_frame_zero() {
        let s = sheet(basic_frame_infos(3, 2, IVec2::ZERO), Playback::Loop);
        let mut p = AnimPlayer::new();

        assert!(!p.advance(&s));
        assert_eq!((p.frame, p.elapsed), (0, 0));
    }

    #[test]
    fn test_linear_loop() {
        let s = sheet(basic_frame_infos(3, 2, IVec2::ZERO), Playback::Loop);
        let mut p = AnimPlayer::new();

        assert_eq!(frames_seen(&mut p, &s, 8), vec![0, 0, 1, 1, 2, 2, 0, 0]);
    }

    #[test]
    fn test_reset_restarts() {
        let s = sheet(basic_frame_infos(3, 1, IVec2::ZERO), Playback::Loop);
        let mut p = AnimPlayer::new();
        frames_seen(&mut p, &s, 4);

        p.reset();

        assert_eq!(frames_seen(&mut p, &s, 3), vec![0, 1, 2]);
    }

    #[test]
    fn test_infinite_duration_holds() {
        let mut frames = basic_frame_infos(2, 1, IVec2::ZERO);
        frames[1].duration = -1;
        let s = sheet(frames, Playback::Loop);
        let mut p = AnimPlayer::new();

        assert_eq!(frames_seen(&mut p, &s, 5), vec![0, 1, 1, 1, 1]);
    }

    #[test]
    fn test_branching_next() {
        // 0 -> 2 -> 1 -> 2 -> 1 ...
        let frames = vec![
            FrameInfo { duration: 1, next: 2, offset: IVec2::ZERO },
            FrameInfo { duration: 1, next: 2, offset: IVec2::ZERO },
            FrameInfo { duration: 1, next: 1, offset: IVec2::ZERO },
        ];
        let s = sheet(frames, Playback::Loop);
        let mut p = AnimPlayer::new();

        assert_eq!(frames_seen(&mut p, &s, 5), vec![0, 2, 1, 2, 1]);
    }

    #[test]
    fn test_one_shot_runs_out() {
        let s = sheet(one_shot_frame_infos(2, 1, IVec2::ZERO), Playback::OneShot);
        let mut p = AnimPlayer::new();

        assert_eq!(frames_seen(&mut p, &s, 4), vec![0, 1, 2, 2]);
        assert!(p.finished(&s));
        assert!(s.frame_src(p.frame).is_empty());
    }

    #[test]
    fn test_zero_duration_acts_as_one() {
        let s = sheet(basic_frame_infos(2, 0, IVec2::ZERO), Playback::Loop);
        let mut p = AnimPlayer::new();

        assert_eq!(frames_seen(&mut p, &s, 4), vec![0, 1, 0, 1]);
    }
}
