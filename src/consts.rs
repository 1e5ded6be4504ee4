pub mod cli_consts {
    //! Dashboard Configuration Constants
    //!
    //! Constants shared by the dashboard, the live query sessions and the
    //! server, organized by functional area.

    // =============================================================================
    // QUEUE CONFIGURATION
    // =============================================================================

    /// The maximum number of events to keep in the activity logs.
    pub const MAX_ACTIVITY_LOGS: usize = 100;

    /// Capacity of the activity event channel.
    pub const EVENT_QUEUE_SIZE: usize = 100;

    /// Result sets buffered per live query before the producer waits.
    pub const SUBSCRIPTION_BUFFER_SIZE: usize = 16;

    /// Writes buffered on the database changefeed per listener.
    pub const CHANGEFEED_BUFFER_SIZE: usize = 256;

    // =============================================================================
    // SERVER CONFIGURATION
    // =============================================================================

    /// Port used outside production.
    pub const DEFAULT_PORT: u16 = 3000;

    /// Route of the WebSocket bridge.
    pub const DB_PATH: &str = "/db";

    /// Route of the health check.
    pub const HEALTH_PATH: &str = "/health";

    // =============================================================================
    // UI CONFIGURATION
    // =============================================================================

    pub mod ui {
        use std::time::Duration;

        /// Redraw interval of the dashboard (milliseconds)
        pub const TICK_RATE_MS: u64 = 100;

        /// How long the splash screen stays up (milliseconds)
        pub const SPLASH_DURATION_MS: u64 = 2_000;

        /// Values kept per chart series
        pub const MAX_CHART_POINTS: usize = 500;

        /// Width of a variable's chart panel (columns)
        pub const CHART_PANEL_COLUMNS: u16 = 72;

        pub const fn tick_rate() -> Duration {
            Duration::from_millis(TICK_RATE_MS)
        }

        pub const fn splash_duration() -> Duration {
            Duration::from_millis(SPLASH_DURATION_MS)
        }
    }
}
