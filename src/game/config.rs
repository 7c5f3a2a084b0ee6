/// Configuration for the game
#[derive(Debug, Clone)]
pub struct GameConfig {
    /// Side of the square play field, in cells
    pub grid_size: usize,
    /// Points awarded per food eaten
    pub food_reward: u32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            food_reward: 10,
        }
    }
}

impl GameConfig {
    /// Create a configuration with a custom grid size
    pub fn new(grid_size: usize) -> Self {
        Self {
            grid_size,
            ..Default::default()
        }
    }

    /// A small grid for tests
    pub fn small() -> Self {
        Self::new(10)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GameConfig::default();
        assert_eq!(config.grid_size, 20);
        assert_eq!(config.food_reward, 10);
    }

    #[test]
    fn test_custom_config() {
        let config = GameConfig::new(15);
        assert_eq!(config.grid_size, 15);
        assert_eq!(config.food_reward, 10);
    }
}
