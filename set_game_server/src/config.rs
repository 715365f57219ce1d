use std::env;
use std::fs;
use std::net::SocketAddr;

use serde::Deserialize;
use set_game_core::SessionConfig;
use thiserror::Error;

/// 配置文件路径所在的环境变量
pub const CONFIG_ENV: &str = "SET_GAME_CONFIG";
/// 覆盖监听地址的环境变量
pub const ADDR_ENV: &str = "SET_GAME_ADDR";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub addr: SocketAddr,
    /// 每个新会话使用的规则参数
    pub session: SessionConfig,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("读取配置文件 {path} 失败: {source}")]
    Read { path: String, source: std::io::Error },
    #[error("配置文件格式错误: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("无效的监听地址 {0}")]
    Addr(String),
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            addr: SocketAddr::from(([0, 0, 0, 0], 25917)),
            session: SessionConfig::default(),
        }
    }
}

impl ServerConfig {
    /// 先读 `SET_GAME_CONFIG` 指向的 JSON 文件（没有则用默认值），再用 `SET_GAME_ADDR` 覆盖地址
    pub fn load() -> Result<ServerConfig, ConfigError> {
        let config = match env::var(CONFIG_ENV) {
            Ok(path) => {
                let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read { path, source })?;
                ServerConfig::from_json(&text)?
            }
            Err(_) => ServerConfig::default(),
        };
        config.with_addr_override(env::var(ADDR_ENV).ok())
    }

    pub fn from_json(text: &str) -> Result<ServerConfig, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    fn with_addr_override(mut self, addr: Option<String>) -> Result<ServerConfig, ConfigError> {
        if let Some(addr) = addr {
            self.addr = addr.parse().map_err(|_| ConfigError::Addr(addr))?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ServerConfig::from_json("{}").unwrap();
        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.addr.port(), 25917);
        assert_eq!(config.session.tableau_size, 12);
    }

    #[test]
    fn test_nested_session_config() {
        let config = ServerConfig::from_json(
            r#"{"addr": "127.0.0.1:9000", "session": {"points_per_match": 1, "seed": 7}}"#,
        )
        .unwrap();
        assert_eq!(config.addr, "127.0.0.1:9000".parse().unwrap());
        assert_eq!(config.session.points_per_match, 1);
        assert_eq!(config.session.seed, Some(7));
        assert_eq!(config.session.tableau_size, 12);
    }

    #[test]
    fn test_addr_override() {
        let config = ServerConfig::default().with_addr_override(Some("127.0.0.1:1234".into())).unwrap();
        assert_eq!(config.addr.port(), 1234);

        let err = ServerConfig::default().with_addr_override(Some("not an addr".into()));
        assert!(matches!(err, Err(ConfigError::Addr(_))));
    }
}
