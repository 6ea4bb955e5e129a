/// Number of buckets in the line clear histogram. Resolutions clearing more rows than
/// the last index are counted in the last bucket.
pub const LINE_CLEAR_BUCKETS: usize = 5;

/// Session statistics: elapsed ticks, locked pieces and line clears.
///
/// There is no score or level; agents are judged by the reward signal instead.
///
/// # Example
///
/// ```
/// use evotris_engine::GameStats;
///
/// let mut stats = GameStats::new();
/// stats.complete_piece_drop(2);
///
/// assert_eq!(stats.completed_pieces(), 1);
/// assert_eq!(stats.total_cleared_lines(), 2);
/// assert_eq!(stats.line_cleared_counter()[2], 1);
/// ```
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GameStats {
    ticks: u64,
    completed_pieces: usize,
    total_cleared_lines: usize,
    line_cleared_counter: [usize; LINE_CLEAR_BUCKETS],
}

impl GameStats {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ticks: 0,
            completed_pieces: 0,
            total_cleared_lines: 0,
            line_cleared_counter: [0; LINE_CLEAR_BUCKETS],
        }
    }

    /// Number of `tick` calls that advanced the session.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    #[must_use]
    pub const fn completed_pieces(&self) -> usize {
        self.completed_pieces
    }

    #[must_use]
    pub const fn total_cleared_lines(&self) -> usize {
        self.total_cleared_lines
    }

    /// Histogram of resolutions by number of rows cleared at once.
    ///
    /// `[0]` counts pieces that cleared nothing, `[1]` singles, and so on.
    #[must_use]
    pub const fn line_cleared_counter(&self) -> &[usize; LINE_CLEAR_BUCKETS] {
        &self.line_cleared_counter
    }

    pub(crate) const fn increment_tick(&mut self) {
        self.ticks += 1;
    }

    /// Records a locked piece and the rows its resolution cleared.
    pub const fn complete_piece_drop(&mut self, cleared_lines: usize) {
        self.completed_pieces += 1;
        self.total_cleared_lines += cleared_lines;
        let bucket = if cleared_lines < LINE_CLEAR_BUCKETS {
            cleared_lines
        } else {
            LINE_CLEAR_BUCKETS - 1
        };
        self.line_cleared_counter[bucket] += 1;
    }
}
