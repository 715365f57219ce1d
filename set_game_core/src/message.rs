use crate::card::Card;
use crate::rules::Triple;
use crate::state::{HintReport, HintStep, SelectOutcome, SessionId, SessionStats, TableauSnapshot};
use serde::{Deserialize, Serialize};

// --- 客户端 -> 服务器 的消息 ---
// 玩家的操作意图，服务器据此驱动会话状态机。

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ClientMessage {
    /// 开始一局新游戏（已有会话时等同于重新开始）
    StartSession,
    /// 点选桌面上的一个位置
    SelectCard { position: usize },
    /// 请求计算当前桌面上的全部组合
    RequestHint,
    /// 显示下一条提示
    NextHint,
    /// 放弃当前桌面，换一批牌
    ChangeCards,
    /// 重新开始，分数清零
    Restart,
}

// --- 服务器 -> 客户端 的消息 ---

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum ServerMessage {
    /// 新的一局开始（包括重新开始）
    SessionStarted {
        session_id: SessionId,
        snapshot: TableauSnapshot,
    },

    /// 点选的结果；选满 3 张时带有判定结果
    CardSelected(SelectOutcome),

    /// 当前桌面上的全部组合
    Hints(HintReport),

    /// 逐条显示的提示
    HintShown(HintStep),

    /// 整个桌面被替换（换牌，或没有组合时服务器自动换牌）
    TableauChanged(TableauSnapshot),

    /// 牌堆已空且桌面上没有组合
    GameOver { score: u32, stats: SessionStats },

    /// 服务器向客户端发送错误信息
    Error { message: String },
}

/// 提示中的三张牌，方便展示层直接高亮
pub fn cards_of(tableau: &[Option<Card>], triple: &Triple) -> Vec<Card> {
    triple.iter().filter_map(|&pos| tableau.get(pos).copied().flatten()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use crate::state::Session;

    #[test]
    fn test_client_message_json() {
        let msg: ClientMessage = serde_json::from_str(r#"{"SelectCard":{"position":4}}"#).unwrap();
        assert_eq!(msg, ClientMessage::SelectCard { position: 4 });

        let msg: ClientMessage = serde_json::from_str(r#""RequestHint""#).unwrap();
        assert_eq!(msg, ClientMessage::RequestHint);
    }

    #[test]
    fn test_server_message_round_trip() {
        let session = Session::new(SessionConfig { seed: Some(1), ..SessionConfig::default() });
        let msg = ServerMessage::SessionStarted { session_id: session.id(), snapshot: session.snapshot() };
        let text = serde_json::to_string(&msg).unwrap();
        assert_eq!(serde_json::from_str::<ServerMessage>(&text).unwrap(), msg);
    }

    #[test]
    fn test_cards_of_skips_empty_slots() {
        let session = Session::new(SessionConfig::default());
        let mut tableau = session.tableau().to_vec();
        tableau[1] = None;
        let cards = cards_of(&tableau, &[0, 1, 2]);
        assert_eq!(cards.len(), 2);
        assert_eq!(cards[0], tableau[0].unwrap());
    }
}
