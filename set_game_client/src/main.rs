use crossterm::style::{StyledContent, Stylize};
use futures_util::{SinkExt, StreamExt};
use std::io::Write;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio_tungstenite::{connect_async, tungstenite::protocol::Message};
use url::Url;

use set_game_core::{cards_of, Card, ClientMessage, Color, Evaluation, ServerMessage};

const DEFAULT_URL: &str = "ws://127.0.0.1:25917/ws";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let url = Url::parse(&std::env::args().nth(1).unwrap_or_else(|| DEFAULT_URL.to_string()))?;

    println!("正在连接到: {}", url);
    let (ws_stream, _) = connect_async(url.as_str()).await?;
    println!("连接成功!");

    let (mut write, mut read) = ws_stream.split();

    // 启动一个任务来处理从服务器接收的消息，并维护本地的桌面副本用于显示
    tokio::spawn(async move {
        let mut tableau: Vec<Option<Card>> = Vec::new();
        while let Some(msg) = read.next().await {
            match msg {
                Ok(Message::Text(text)) => match serde_json::from_str::<ServerMessage>(&text) {
                    Ok(server_msg) => {
                        println!();
                        show(&server_msg, &mut tableau);
                        print!("> "); // 重新显示输入提示符
                        let _ = std::io::stdout().flush();
                    }
                    Err(e) => eprintln!("解析服务器消息失败: {}", e),
                },
                Ok(_) => {}
                Err(e) => {
                    eprintln!("接收消息时出错: {}", e);
                    break;
                }
            }
        }
    });

    // 主任务处理用户输入
    let mut stdin = BufReader::new(tokio::io::stdin()).lines();

    println!("--- SET 客户端 ---");
    println!("可用命令:");
    println!("  start                     - 开始游戏");
    println!("  pick <位置> [位置...]      - 选择 (或取消选择) 桌面上的牌");
    println!("  hint                      - 计算当前桌面上的所有组合");
    println!("  next                      - 显示下一条提示");
    println!("  change                    - 换一批牌");
    println!("  restart                   - 重新开始");
    println!("  exit                      - 退出");

    loop {
        print!("> ");
        std::io::stdout().flush()?;

        let Some(line) = stdin.next_line().await? else { break };
        let parts: Vec<&str> = line.split_whitespace().collect();

        let client_msgs = match parts.first().copied() {
            Some("start") => vec![ClientMessage::StartSession],
            Some("pick") => {
                let positions: Result<Vec<usize>, _> = parts[1..].iter().map(|p| p.parse::<usize>()).collect();
                match positions {
                    Ok(positions) if !positions.is_empty() => positions
                        .into_iter()
                        .map(|position| ClientMessage::SelectCard { position })
                        .collect(),
                    _ => {
                        println!("用法: pick <位置> [位置...]");
                        continue;
                    }
                }
            }
            Some("hint") => vec![ClientMessage::RequestHint],
            Some("next") => vec![ClientMessage::NextHint],
            Some("change") => vec![ClientMessage::ChangeCards],
            Some("restart") => vec![ClientMessage::Restart],
            Some("exit") => {
                println!("正在断开连接...");
                break;
            }
            None => continue,
            _ => {
                println!("未知命令: {}", line);
                continue;
            }
        };

        for msg in client_msgs {
            let payload = serde_json::to_string(&msg)?;
            write.send(Message::Text(payload.into())).await?;
        }
    }

    Ok(())
}

/// 打印一条服务器消息，并同步本地桌面
fn show(msg: &ServerMessage, tableau: &mut Vec<Option<Card>>) {
    match msg {
        ServerMessage::SessionStarted { snapshot, .. } => {
            *tableau = snapshot.tableau.clone();
            println!("新的一局开始，牌堆剩余 {} 张", snapshot.remaining);
            print_tableau(tableau);
        }
        ServerMessage::TableauChanged(snapshot) => {
            *tableau = snapshot.tableau.clone();
            println!("桌面已更换，牌堆剩余 {} 张，当前得分 {}", snapshot.remaining, snapshot.score);
            print_tableau(tableau);
        }
        ServerMessage::CardSelected(outcome) => {
            if outcome.discarded {
                println!("选择已被清空，请重新选择");
            } else if let Some(eval) = &outcome.evaluation {
                apply_evaluation(eval, tableau);
            } else {
                let verb = if outcome.selected { "选中" } else { "取消选中" };
                println!("{} [{}]", verb, outcome.position);
            }
        }
        ServerMessage::Hints(report) => {
            if report.exhausted {
                println!("❌ 牌堆已空，也没有可用的组合");
            } else if report.triples.is_empty() {
                println!("❌ 没有组合，服务器将更换桌面");
            } else {
                println!("桌面上共有 {} 组，输入 next 逐条查看", report.triples.len());
            }
        }
        ServerMessage::HintShown(step) => {
            let cards: Vec<String> = cards_of(tableau, &step.triple).iter().map(|c| paint(c).to_string()).collect();
            println!("提示 {}/{}: {:?} {}", step.index + 1, step.total, step.triple, cards.join(" | "));
        }
        ServerMessage::GameOver { score, stats } => {
            println!(
                "游戏结束！得分 {}（成功 {} 次，失败 {} 次，使用提示 {} 次）",
                score, stats.matches, stats.misses, stats.hints_used
            );
        }
        ServerMessage::Error { message } => println!("错误: {}", message),
    }
}

fn apply_evaluation(eval: &Evaluation, tableau: &mut [Option<Card>]) {
    if !eval.valid {
        println!("❌ {:?} 不是一组", eval.positions);
        return;
    }
    println!("✅ {:?} 成组! +{} 分，当前得分 {}", eval.positions, eval.score_delta, eval.score);
    for (pos, card) in eval.replaced_positions.iter().zip(&eval.new_cards) {
        if let Some(slot) = tableau.get_mut(*pos) {
            *slot = Some(*card);
        }
    }
    for pos in &eval.removed_positions {
        if let Some(slot) = tableau.get_mut(*pos) {
            *slot = None;
        }
    }
    println!("牌堆剩余 {} 张", eval.remaining);
    print_tableau(tableau);
}

fn print_tableau(tableau: &[Option<Card>]) {
    for (pos, slot) in tableau.iter().enumerate() {
        match slot {
            Some(card) => println!("  [{:>2}] {}", pos, paint(card)),
            None => println!("  [{:>2}] --", pos),
        }
    }
}

/// 按牌的颜色属性着色
fn paint(card: &Card) -> StyledContent<String> {
    let text = card.to_string();
    match card.color() {
        Color::Red => text.red(),
        Color::Green => text.green(),
        Color::Purple => text.magenta(),
    }
}
