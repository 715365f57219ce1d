//! # SET 卡牌游戏核心逻辑库
//!
//! 这个 `core` crate 包含了游戏的全部规则与状态管理：
//! 81 张牌的牌组、三张牌的成组判定、会话状态机、提示游标，
//! 以及客户端-服务器通信消息的定义。
//! 它不做任何 IO，可以被服务器、终端客户端或其他展示层复用。

mod card;
mod config;
mod deck;
mod error;
mod hint;
mod logic;
mod message;
mod rules;
mod state;

pub use card::*;

pub use config::*;

pub use deck::*;

pub use error::*;

pub use hint::*;

pub use message::*;

pub use rules::*;

pub use state::*;
