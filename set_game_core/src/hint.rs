use crate::error::GameError;
use crate::rules::Triple;
use serde::{Deserialize, Serialize};

/// 提示游标 (HintCursor)
///
/// 保存某一时刻桌面上所有有效组合，并循环地逐个给出。
/// 桌面一旦变化，已有的提示就失效，必须 `clear` 后重新加载。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct HintCursor {
    triples: Vec<Triple>,
    cursor: usize,
}

impl HintCursor {
    /// 载入新的提示列表并把游标归零。列表为空时返回 `false`（"没有组合"）。
    pub fn load(&mut self, triples: Vec<Triple>) -> bool {
        self.triples = triples;
        self.cursor = 0;
        !self.triples.is_empty()
    }

    /// 返回当前游标处的组合，然后游标前进一格，到末尾后回到开头
    pub fn next(&mut self) -> Result<Triple, GameError> {
        let triple = *self.triples.get(self.cursor).ok_or(GameError::StaleHintRequest)?;
        self.cursor = (self.cursor + 1) % self.triples.len();
        Ok(triple)
    }

    pub fn clear(&mut self) {
        self.triples.clear();
        self.cursor = 0;
    }

    pub fn len(&self) -> usize {
        self.triples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.triples.is_empty()
    }

    /// 下一次 `next` 将返回的下标
    pub fn position(&self) -> usize {
        self.cursor
    }

    pub fn triples(&self) -> &[Triple] {
        &self.triples
    }
}
