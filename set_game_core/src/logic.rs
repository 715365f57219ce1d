use crate::card::Card;
use crate::config::SessionConfig;
use crate::deck::Deck;
use crate::error::GameError;
use crate::hint::HintCursor;
use crate::rules::{find_valid_triples_in_slots, is_valid_triple, Triple};
use crate::state::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use uuid::Uuid;

// --- 核心游戏流程函数 ---

impl Session {
    /// 开始新的一局
    ///
    /// - 按配置的种子（或随机）洗好一副 81 张的新牌。
    /// - 从牌堆前端发出一整桌牌。
    /// - 分数、计数、选择和提示都从零开始。
    pub fn new(config: SessionConfig) -> Session {
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => entropy_rng(),
        };
        let deck = Deck::new(&mut rng);
        Session::build(config, deck, rng)
    }

    /// 用一副指定顺序的牌开始新的一局。之后的 `restart` 仍然使用随机洗牌。
    pub fn with_deck(config: SessionConfig, deck: Deck) -> Session {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => entropy_rng(),
        };
        Session::build(config, deck, rng)
    }

    fn build(config: SessionConfig, deck: Deck, rng: StdRng) -> Session {
        let mut session = Session {
            id: Uuid::new_v4(),
            config,
            deck,
            tableau: Vec::new(),
            selection: Vec::new(),
            phase: SelectionPhase::Idle,
            score: 0,
            stats: SessionStats::default(),
            hints: HintCursor::default(),
            rng,
        };
        session.fill_tableau();
        session
    }

    /// 处理玩家点选一个桌面位置
    ///
    /// 这是游戏逻辑的核心驱动函数。
    /// - 越界或空位直接报错，不修改任何状态。
    /// - 已选中的位置再次点选会取消选择。
    /// - 选满 3 张时立即判定，判定完成后清空选择。
    ///
    /// 如果上一次判定没有清理干净（处于 `Evaluating`，或已有 3 个选择），
    /// 这次点选不会被计入，所有选择被丢弃，回到 `Idle`。
    /// 这样连续的重复输入不会被重复计分。
    pub fn select_position(&mut self, position: usize) -> Result<SelectOutcome, GameError> {
        let len = self.tableau.len();
        if position >= len {
            return Err(GameError::InvalidPosition { position, len });
        }
        if self.tableau[position].is_none() {
            return Err(GameError::EmptySlot(position));
        }

        if self.phase == SelectionPhase::Evaluating || self.selection.len() >= 3 {
            self.clear_selection();
            return Ok(SelectOutcome { position, selected: false, discarded: true, evaluation: None });
        }

        let selected = match self.selection.iter().position(|&p| p == position) {
            Some(idx) => {
                self.selection.remove(idx);
                false
            }
            None => {
                self.selection.push(position);
                true
            }
        };

        let evaluation = match self.selection.len() {
            0 => {
                self.phase = SelectionPhase::Idle;
                None
            }
            1 | 2 => {
                self.phase = SelectionPhase::Selecting;
                None
            }
            _ => {
                self.phase = SelectionPhase::Evaluating;
                let evaluation = self.evaluate_selection();
                self.clear_selection();
                Some(evaluation)
            }
        };

        Ok(SelectOutcome { position, selected, discarded: false, evaluation })
    }

    /// 判定当前选中的三张牌
    ///
    /// 成功时加分、清空提示，并从牌堆补牌；牌堆不够时对应位置变为空位。
    /// 失败时只增加失败计数，桌面不变。
    fn evaluate_selection(&mut self) -> Evaluation {
        let mut positions: Triple = [self.selection[0], self.selection[1], self.selection[2]];
        positions.sort_unstable();

        let cards: Vec<Card> = positions.iter().filter_map(|&p| self.tableau.get(p).copied().flatten()).collect();
        let valid = cards.len() == 3 && is_valid_triple(&cards[0], &cards[1], &cards[2]);

        let mut evaluation = Evaluation {
            valid,
            positions,
            score_delta: 0,
            replaced_positions: Vec::new(),
            new_cards: Vec::new(),
            removed_positions: Vec::new(),
            remaining: self.deck.remaining(),
            score: self.score,
        };

        if !valid {
            self.stats.misses += 1;
            return evaluation;
        }

        self.stats.matches += 1;
        self.score += self.config.points_per_match;
        // 桌面即将变化，旧提示作废
        self.hints.clear();

        let mut new_cards = self.deck.draw(positions.len()).into_iter();
        for &pos in &positions {
            match new_cards.next() {
                Some(card) => {
                    self.tableau[pos] = Some(card);
                    evaluation.replaced_positions.push(pos);
                    evaluation.new_cards.push(card);
                }
                None => {
                    self.tableau[pos] = None;
                    evaluation.removed_positions.push(pos);
                }
            }
        }

        evaluation.score_delta = self.config.points_per_match;
        evaluation.remaining = self.deck.remaining();
        evaluation.score = self.score;
        evaluation
    }

    /// 重新开始：新牌堆、新桌面，分数与所有计数清零
    pub fn restart(&mut self) -> TableauSnapshot {
        self.deck = Deck::new(&mut self.rng);
        self.score = 0;
        self.stats = SessionStats::default();
        self.hints.clear();
        self.clear_selection();
        self.fill_tableau();
        self.snapshot()
    }

    /// 换一批牌：桌面上的牌全部作废（不回到牌堆），从牌堆再发最多一整桌。
    ///
    /// 牌堆不够一整桌时桌面变短；牌堆已空时桌面也被清空，此时 `is_over` 为真。
    /// 分数和计数保留。
    pub fn change_cards(&mut self) -> TableauSnapshot {
        self.hints.clear();
        self.clear_selection();
        self.fill_tableau();
        self.snapshot()
    }

    /// 重新计算桌面上的所有组合并载入提示游标
    ///
    /// 返回空列表表示"没有组合"，调用方通常会接着调用 `change_cards`。
    pub fn request_hints(&mut self) -> HintReport {
        let triples = find_valid_triples_in_slots(&self.tableau);
        self.hints.load(triples.clone());
        let exhausted = triples.is_empty() && self.deck.is_empty();
        HintReport { triples, exhausted }
    }

    /// 给出下一条提示（循环）。没有载入提示时返回 `StaleHintRequest`。
    pub fn next_hint(&mut self) -> Result<HintStep, GameError> {
        let index = self.hints.position();
        let triple = self.hints.next()?;
        self.stats.hints_used += 1;
        Ok(HintStep { triple, index, total: self.hints.len() })
    }

    /// 牌堆已空且桌面上没有任何组合
    pub fn is_over(&self) -> bool {
        self.deck.is_empty() && find_valid_triples_in_slots(&self.tableau).is_empty()
    }

    // --- 辅助逻辑函数 ---

    fn fill_tableau(&mut self) {
        self.tableau = self.deck.draw(self.config.tableau_size).into_iter().map(Some).collect();
    }

    fn clear_selection(&mut self) {
        self.selection.clear();
        self.phase = SelectionPhase::Idle;
    }
}

// --- 单元测试 ---
