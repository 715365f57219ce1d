use serde::{Deserialize, Serialize};

/// 默认桌面张数
pub const DEFAULT_TABLEAU_SIZE: usize = 12;
/// 每成功凑出一组获得的分数
pub const DEFAULT_POINTS_PER_MATCH: u32 = 3;

/// 单个会话的规则参数
///
/// 所有字段都有默认值，配置文件里可以只写需要覆盖的部分。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tableau_size: usize,
    pub points_per_match: u32,
    /// 固定随机种子，便于复现同一局；为空时每局随机洗牌
    pub seed: Option<u64>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            tableau_size: DEFAULT_TABLEAU_SIZE,
            points_per_match: DEFAULT_POINTS_PER_MATCH,
            seed: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_uses_defaults() {
        let config: SessionConfig = serde_json::from_str(r#"{"points_per_match": 5}"#).unwrap();
        assert_eq!(config.points_per_match, 5);
        assert_eq!(config.tableau_size, DEFAULT_TABLEAU_SIZE);
        assert_eq!(config.seed, None);
    }
}
