use crate::card::Card;
use crate::config::SessionConfig;
use crate::deck::Deck;
use crate::hint::HintCursor;
use crate::rules::Triple;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub type SessionId = Uuid;

/// 一局游戏的全部状态
///
/// 由应用层（例如服务器上的某个连接）持有，展示层只读取快照。
/// 牌堆只存在于服务端，所以 `Session` 本身不做序列化，发给客户端的是 `TableauSnapshot`。
/// 状态转换的方法定义在 `logic.rs` 中。
#[derive(Debug, Clone)]
pub struct Session {
    pub(crate) id: SessionId,
    pub(crate) config: SessionConfig,
    // 服务端持有的牌堆，不会直接发给客户端
    pub(crate) deck: Deck,
    // 桌面槽位，牌发完后被移除的位置为 None
    pub(crate) tableau: Vec<Option<Card>>,
    // 已选中的位置，按选择顺序排列，最多 3 个
    pub(crate) selection: Vec<usize>,
    pub(crate) phase: SelectionPhase,
    pub(crate) score: u32,
    pub(crate) stats: SessionStats,
    pub(crate) hints: HintCursor,
    pub(crate) rng: StdRng,
}

/// 选牌状态机
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum SelectionPhase {
    /// 没有选中任何牌
    #[default]
    Idle,
    /// 已选中 1 或 2 张
    Selecting,
    /// 第 3 张已选中，正在判定
    Evaluating,
}

/// 本局计数
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct SessionStats {
    pub matches: u32,
    pub misses: u32,
    pub hints_used: u32,
}

/// 桌面快照，开始、重开、换牌后发给展示层
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TableauSnapshot {
    pub tableau: Vec<Option<Card>>,
    pub remaining: usize,
    pub score: u32,
    pub stats: SessionStats,
}

/// 一次选牌的结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SelectOutcome {
    pub position: usize,
    /// 操作之后该位置是否处于选中状态
    pub selected: bool,
    /// 残留的选择被整体丢弃（判定尚未清理时又来了新的选择）
    pub discarded: bool,
    /// 选满 3 张时的判定结果
    pub evaluation: Option<Evaluation>,
}

/// 三张牌的判定结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Evaluation {
    pub valid: bool,
    /// 参与判定的三个位置（升序）
    pub positions: Triple,
    pub score_delta: u32,
    /// 补上了新牌的位置，与 `new_cards` 一一对应
    pub replaced_positions: Vec<usize>,
    pub new_cards: Vec<Card>,
    /// 牌堆不够补牌而被移除的位置
    pub removed_positions: Vec<usize>,
    pub remaining: usize,
    pub score: u32,
}

/// 请求提示的结果
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HintReport {
    pub triples: Vec<Triple>,
    /// 桌面上没有任何组合且牌堆已空：本局结束
    pub exhausted: bool,
}

/// 逐条显示提示时的一步
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HintStep {
    pub triple: Triple,
    /// 当前提示的下标，从 0 开始
    pub index: usize,
    pub total: usize,
}

pub(crate) fn entropy_rng() -> StdRng {
    StdRng::from_rng(&mut rand::rng())
}

// --- Session 的只读访问 ---

impl Session {
    pub fn id(&self) -> SessionId {
        self.id
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tableau(&self) -> &[Option<Card>] {
        &self.tableau
    }

    /// 桌面上现有的牌（跳过空位）
    pub fn cards_on_table(&self) -> Vec<Card> {
        self.tableau.iter().flatten().copied().collect()
    }

    pub fn selection(&self) -> &[usize] {
        &self.selection
    }

    pub fn phase(&self) -> SelectionPhase {
        self.phase
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn stats(&self) -> SessionStats {
        self.stats
    }

    pub fn remaining(&self) -> usize {
        self.deck.remaining()
    }

    pub fn hints(&self) -> &HintCursor {
        &self.hints
    }

    pub fn snapshot(&self) -> TableauSnapshot {
        TableauSnapshot {
            tableau: self.tableau.clone(),
            remaining: self.deck.remaining(),
            score: self.score,
            stats: self.stats,
        }
    }
}
