mod config;

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket},
        State, WebSocketUpgrade,
    },
    response::IntoResponse,
    routing::get,
    Json, Router,
};
use dashmap::DashMap;
use futures_util::{stream::StreamExt, SinkExt};
use parking_lot::Mutex as P_Mutex;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};
use tracing_subscriber::EnvFilter;

use set_game_core::{create_universe, ClientMessage, ServerMessage, Session, SessionId};

use crate::config::ServerConfig;

// 服务器全局状态
// 每个 WebSocket 连接拥有自己的一局游戏，这里只是按 id 登记，便于统计和清理
struct AppState {
    sessions: DashMap<SessionId, Arc<P_Mutex<Session>>>,
    config: ServerConfig,
}

type SharedState = Arc<AppState>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::load()?;
    let addr = config.addr;

    let state = SharedState::new(AppState {
        sessions: DashMap::new(),
        config,
    });

    let app = Router::new()
        .route("/ws", get(websocket_handler))
        .route("/cards", get(cards_handler))
        .with_state(state);

    info!("服务器正在监听 {}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// 返回完整的 81 张牌
async fn cards_handler() -> impl IntoResponse {
    Json(create_universe())
}

/// 处理 WebSocket 连接请求
async fn websocket_handler(
    ws: WebSocketUpgrade,
    State(state): State<SharedState>,
) -> impl IntoResponse {
    ws.on_upgrade(|socket| handle_socket(socket, state))
}

/// 处理单个 WebSocket 连接的生命周期
async fn handle_socket(socket: WebSocket, state: SharedState) {
    let (mut sender, mut receiver) = socket.split();

    // 创建一个 MPSC 通道，用于从其他任务接收要发送的消息
    let (tx, mut rx) = mpsc::channel::<ServerMessage>(32);

    // 启动一个新任务，专门负责将 MPSC 通道中的消息发送到 WebSocket
    tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let payload = match serde_json::to_string(&msg) {
                Ok(payload) => payload,
                Err(e) => {
                    warn!("序列化消息失败: {}", e);
                    continue;
                }
            };
            if sender.send(Message::Text(payload.into())).await.is_err() {
                // 发送失败，说明客户端已断开，退出任务
                break;
            }
        }
    });

    // 当前连接对应的会话，在 StartSession 之后填充
    let mut session_context: Option<SessionId> = None;

    // 主循环，处理从客户端接收到的消息
    while let Some(Ok(msg)) = receiver.next().await {
        if let Message::Text(text) = msg {
            match serde_json::from_str::<ClientMessage>(&text) {
                Ok(client_msg) => {
                    handle_client_message(client_msg, &state, &tx, &mut session_context).await;
                }
                Err(e) => {
                    warn!("解析消息失败: {}", e);
                }
            }
        }
    }

    // 客户端断开连接，会话随之销毁
    if let Some(session_id) = session_context {
        state.sessions.remove(&session_id);
        info!("会话 {} 已结束，当前在线会话 {} 个", session_id, state.sessions.len());
    }
    info!("客户端连接关闭");
}

/// 核心消息处理逻辑
async fn handle_client_message(
    msg: ClientMessage,
    state: &SharedState,
    tx: &mpsc::Sender<ServerMessage>,
    context: &mut Option<SessionId>,
) {
    let session = match (context.as_ref(), &msg) {
        (Some(id), _) => match state.sessions.get(id).map(|s| s.clone()) {
            Some(s) => s,
            None => {
                send(tx, ServerMessage::Error { message: "会话不存在".to_string() }).await;
                return;
            }
        },
        (None, ClientMessage::StartSession) => {
            let session = Session::new(state.config.session.clone());
            let session_id = session.id();
            let snapshot = session.snapshot();
            state.sessions.insert(session_id, Arc::new(P_Mutex::new(session)));
            *context = Some(session_id);
            info!("新会话 {} 已创建，当前在线会话 {} 个", session_id, state.sessions.len());
            send(tx, ServerMessage::SessionStarted { session_id, snapshot }).await;
            return;
        }
        (None, _) => {
            send(tx, ServerMessage::Error { message: "请先开始游戏".to_string() }).await;
            return;
        }
    };

    // 锁只在同步的状态转换期间持有，发送消息前释放
    let messages = {
        let mut session = session.lock();
        debug!("会话 {} 收到 {:?}", session.id(), msg);
        dispatch(&mut session, msg)
    };

    for msg in messages {
        send(tx, msg).await;
    }
}

/// 把一条客户端指令应用到会话上，返回需要发给客户端的消息
///
/// 请求提示时如果桌面上没有组合：牌堆还有牌就自动换一批牌，牌堆空了就宣布游戏结束。
fn dispatch(session: &mut Session, msg: ClientMessage) -> Vec<ServerMessage> {
    match msg {
        ClientMessage::StartSession | ClientMessage::Restart => {
            let snapshot = session.restart();
            vec![ServerMessage::SessionStarted { session_id: session.id(), snapshot }]
        }
        ClientMessage::SelectCard { position } => match session.select_position(position) {
            Ok(outcome) => {
                let matched = outcome.evaluation.as_ref().is_some_and(|e| e.valid);
                let mut messages = vec![ServerMessage::CardSelected(outcome)];
                if matched && session.is_over() {
                    messages.push(game_over(session));
                }
                messages
            }
            Err(e) => vec![ServerMessage::Error { message: e.to_string() }],
        },
        ClientMessage::RequestHint => {
            let report = session.request_hints();
            let no_sets = report.triples.is_empty();
            let exhausted = report.exhausted;
            let mut messages = vec![ServerMessage::Hints(report)];
            if exhausted {
                messages.push(game_over(session));
            } else if no_sets {
                debug!("会话 {} 桌面上没有组合，自动换牌", session.id());
                messages.push(ServerMessage::TableauChanged(session.change_cards()));
            }
            messages
        }
        ClientMessage::NextHint => match session.next_hint() {
            Ok(step) => vec![ServerMessage::HintShown(step)],
            Err(e) => vec![ServerMessage::Error { message: e.to_string() }],
        },
        ClientMessage::ChangeCards => vec![ServerMessage::TableauChanged(session.change_cards())],
    }
}

fn game_over(session: &Session) -> ServerMessage {
    info!("会话 {} 游戏结束，得分 {}", session.id(), session.score());
    ServerMessage::GameOver { score: session.score(), stats: session.stats() }
}

async fn send(tx: &mpsc::Sender<ServerMessage>, msg: ServerMessage) {
    if tx.send(msg).await.is_err() {
        // 发送任务已退出，说明连接断开，后续由 handle_socket 清理
        warn!("向客户端发送消息失败（可能已断开）");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use set_game_core::{Color, Count, Deck, Fill, SessionConfig, Shape};

    fn seeded_session() -> Session {
        Session::new(SessionConfig { seed: Some(17), ..SessionConfig::default() })
    }

    #[test]
    fn test_start_session_resets() {
        let mut session = seeded_session();
        let messages = dispatch(&mut session, ClientMessage::StartSession);
        assert_eq!(messages.len(), 1);
        match &messages[0] {
            ServerMessage::SessionStarted { session_id, snapshot } => {
                assert_eq!(*session_id, session.id());
                assert_eq!(snapshot.tableau.len(), 12);
                assert_eq!(snapshot.remaining, 69);
            }
            other => panic!("意外的消息: {:?}", other),
        }
    }

    #[test]
    fn test_invalid_position_reports_error() {
        let mut session = seeded_session();
        let messages = dispatch(&mut session, ClientMessage::SelectCard { position: 40 });
        assert!(matches!(&messages[..], [ServerMessage::Error { .. }]));
    }

    #[test]
    fn test_next_hint_without_request_is_error() {
        let mut session = seeded_session();
        let messages = dispatch(&mut session, ClientMessage::NextHint);
        assert!(matches!(&messages[..], [ServerMessage::Error { .. }]));
    }

    #[test]
    fn test_hint_then_match() {
        // 未洗牌的牌堆，前 12 张里一定有组合
        let mut session = Session::with_deck(SessionConfig::default(), Deck::ordered());
        let messages = dispatch(&mut session, ClientMessage::RequestHint);
        assert!(matches!(&messages[..], [ServerMessage::Hints(report)] if !report.triples.is_empty()));
        let triple = match dispatch(&mut session, ClientMessage::NextHint).pop() {
            Some(ServerMessage::HintShown(step)) => step.triple,
            other => panic!("意外的消息: {:?}", other),
        };

        dispatch(&mut session, ClientMessage::SelectCard { position: triple[0] });
        dispatch(&mut session, ClientMessage::SelectCard { position: triple[1] });
        let messages = dispatch(&mut session, ClientMessage::SelectCard { position: triple[2] });
        match &messages[0] {
            ServerMessage::CardSelected(outcome) => {
                let eval = outcome.evaluation.as_ref().unwrap();
                assert!(eval.valid);
                assert_eq!(eval.score_delta, 3);
            }
            other => panic!("意外的消息: {:?}", other),
        }
        assert_eq!(session.stats().hints_used, 1);
    }

    #[test]
    fn test_exhausted_hint_request_ends_game() {
        // 牌堆只有 3 张互不成组的牌：桌面 3 张，牌堆为空
        let universe = create_universe();
        let cards = vec![universe[0], universe[1], universe[3]];
        let config = SessionConfig { tableau_size: 3, ..SessionConfig::default() };
        let mut session = Session::with_deck(config, Deck::from_cards(cards));

        let messages = dispatch(&mut session, ClientMessage::RequestHint);
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], ServerMessage::Hints(report) if report.exhausted));
        assert!(matches!(&messages[1], ServerMessage::GameOver { score: 0, .. }));
    }

    #[test]
    fn test_auto_change_on_set_free_cards_reaches_game_over() {
        // 每个属性只取前两种值的 16 张牌，任意三张都不成组
        let cards: Vec<_> = create_universe()
            .into_iter()
            .filter(|c| {
                c.color() != Color::Purple
                    && c.shape() != Shape::Diamond
                    && c.fill() != Fill::Solid
                    && c.count() != Count::Three
            })
            .collect();
        let mut session = Session::with_deck(SessionConfig::default(), Deck::from_cards(cards));

        let messages = dispatch(&mut session, ClientMessage::RequestHint);
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], ServerMessage::Hints(report) if !report.exhausted));
        match &messages[1] {
            ServerMessage::TableauChanged(snapshot) => {
                assert_eq!(snapshot.tableau.len(), 4);
                assert_eq!(snapshot.remaining, 0);
            }
            other => panic!("意外的消息: {:?}", other),
        }

        let messages = dispatch(&mut session, ClientMessage::RequestHint);
        assert_eq!(messages.len(), 2);
        assert!(matches!(&messages[0], ServerMessage::Hints(report) if report.exhausted));
        assert!(matches!(&messages[1], ServerMessage::GameOver { score: 0, .. }));
    }
}
