use thiserror::Error;

/// 引擎向调用方报告的错误。出错时会话状态不会被修改。
///
/// 牌堆发完不算错误：`Deck::draw` 返回的张数变少即表示牌堆已空。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GameError {
    #[error("位置 {position} 超出桌面范围 (共 {len} 个位置)")]
    InvalidPosition { position: usize, len: usize },
    #[error("位置 {0} 上已经没有牌")]
    EmptySlot(usize),
    #[error("没有可用的提示，请重新请求提示")]
    StaleHintRequest,
}
