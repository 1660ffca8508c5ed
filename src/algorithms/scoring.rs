use crate::model::LevelState;
use crate::Level;
use tracing::info;

impl Level {
    /// Evaluate the scoring rule against the live clash count. On success
    /// the win handler runs once and the level leaves Running, so later
    /// checks are no-ops until the next `start`. Returns whether it fired.
    pub fn check_win_condition(&mut self) -> bool {
        if self.state != LevelState::Running {
            return false;
        }
        if !self.rule.is_satisfied(self.clash_count) {
            return false;
        }
        self.state = LevelState::Paused;
        self.bump();
        let status = self.status();
        info!(name = %status.name, clashes = status.clashes, rule = %status.rule, "level won");
        if let Some(handler) = self.on_win.as_mut() {
            handler(&status);
        }
        true
    }
}
