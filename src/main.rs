mod logging;
mod models;
mod output;
mod scenario;
mod simulation;

use std::str::FromStr;

use clap::{Arg, Command};
use logging::{LogConfig, LogOutput, init_logging, parse_log_level};
use models::{Acceleration2D, Position2D, Role, Vehicle, Velocity2D};
use output::write_trajectory_csv;
use scenario::ScenarioConfig;
use simulation::{EngagementOutcome, SimulationEngine};

fn main() {
    // コマンドライン引数の解析
    let matches = Command::new("pnsim")
        .version("0.1.0")
        .about("比例航法迎撃シミュレーション (PN Intercept Simulation)")
        .long_about("追跡・回避交戦シミュレータ\n\
                     弾道ターゲットと比例航法誘導の迎撃機を固定時間刻みで前進させ、\n\
                     捕捉または時間切れまでの交戦を再現します。")
        .arg(
            Arg::new("scenario")
                .short('s')
                .long("scenario")
                .value_name("FILE")
                .help("シナリオファイル(.yaml)のパスを指定")
                .long_help("実行するシナリオファイル(.yaml)のパスを指定します。\n\
                           指定しない場合、利用可能なシナリオの一覧を表示します。")
        )
        .arg(
            Arg::new("info")
                .short('i')
                .long("info")
                .action(clap::ArgAction::SetTrue)
                .help("シナリオの情報のみ表示して終了")
                .conflicts_with("test")
        )
        .arg(
            Arg::new("test")
                .short('t')
                .long("test")
                .action(clap::ArgAction::SetTrue)
                .help("組み込みの基準交戦シナリオを実行")
                .conflicts_with("info")
        )
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("両機の軌跡をCSVファイルに書き出す")
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .action(clap::ArgAction::Count)
                .help("詳細出力レベル (-v: 基本, -vv: 詳細, -vvv: デバッグ)")
        )
        .arg(
            Arg::new("log-level")
                .long("log-level")
                .value_name("LEVEL")
                .default_value("info")
                .help("ログレベル (trace, debug, info, warn, error)")
        )
        .arg(
            Arg::new("log-output")
                .long("log-output")
                .value_name("DEST")
                .default_value("console")
                .help("ログ出力先 (console, file, both)")
        )
        .get_matches();

    println!("比例航法迎撃シミュレーション (PN Intercept Simulation) - pnsim v0.1.0");
    println!();

    // ログシステムの初期化
    let log_level = parse_log_level(
        matches.get_one::<String>("log-level").map(String::as_str).unwrap_or("info"),
    );
    let log_output = matches
        .get_one::<String>("log-output")
        .and_then(|s| LogOutput::from_str(s).map_err(|e| eprintln!("{}", e)).ok())
        .unwrap_or(LogOutput::Console);
    let log_config = LogConfig {
        level: log_level,
        output: log_output,
        ..LogConfig::default()
    };
    if let Err(e) = init_logging(log_config) {
        eprintln!("ログ初期化エラー: {}", e);
    }

    // 詳細レベルの設定
    let verbose_level = matches.get_count("verbose");
    if verbose_level > 0 {
        println!("詳細出力レベル: {}", verbose_level);
    }

    let csv_path = matches.get_one::<String>("output");

    // 組み込み基準シナリオの実行
    if matches.get_flag("test") {
        println!("=== 基準交戦シナリオ ===");
        if let Err(e) = run_reference_engagement(verbose_level, csv_path) {
            eprintln!("エラー: {}", e);
            std::process::exit(1);
        }
        return;
    }

    // シナリオファイルの処理
    if let Some(scenario_path) = matches.get_one::<String>("scenario") {
        match run_scenario(scenario_path, matches.get_flag("info"), verbose_level, csv_path) {
            Ok(_) => {
                if verbose_level > 0 {
                    println!("シナリオ実行が正常に完了しました。");
                }
            }
            Err(e) => {
                eprintln!("エラー: {}", e);
                std::process::exit(1);
            }
        }
    } else {
        // デフォルト動作: 利用可能なシナリオ一覧を表示
        show_default_help();
    }
}

/// 組み込みの基準交戦シナリオを実行
///
/// ターゲット (-50, 500) @ (12, 0) m/s、迎撃機 (0, 0) @ (0, 10) m/s、
/// N=3、dt=0.01秒、捕捉半径0.5m、時間上限100秒。
fn run_reference_engagement(
    verbose_level: u8,
    csv_path: Option<&String>,
) -> Result<(), Box<dyn std::error::Error>> {
    let target = Vehicle::new(
        Role::Target,
        Position2D::new(-50.0, 500.0),
        Velocity2D::new(12.0, 0.0),
        Acceleration2D::zero(),
        3.0,
    );
    let interceptor = Vehicle::new(
        Role::Interceptor,
        Position2D::new(0.0, 0.0),
        Velocity2D::new(0.0, 10.0),
        Acceleration2D::zero(),
        3.0,
    );

    let mut engine =
        SimulationEngine::from_vehicles(target, interceptor, 0.01, 100.0, 0.5, verbose_level);
    let outcome = engine.run();

    report_outcome(outcome, &engine);
    export_trajectory(&engine, csv_path)?;

    Ok(())
}

/// シナリオファイルを読み込んで実行
fn run_scenario(
    scenario_path: &str,
    info_only: bool,
    verbose_level: u8,
    csv_path: Option<&String>,
) -> Result<(), Box<dyn std::error::Error>> {
    // シナリオファイルの読み込み
    let scenario = ScenarioConfig::from_file(scenario_path)?;

    if verbose_level > 0 {
        println!("シナリオファイル読み込み完了: {}", scenario_path);
    }

    // 基本情報表示
    scenario.print_summary();
    println!();

    // 情報表示のみの場合
    if info_only {
        return Ok(());
    }

    // シミュレーションエンジンの作成と実行
    let mut engine = SimulationEngine::new(&scenario, verbose_level);
    let outcome = engine.run();

    report_outcome(outcome, &engine);
    export_trajectory(&engine, csv_path)?;

    Ok(())
}

/// 交戦結果の報告
fn report_outcome(outcome: EngagementOutcome, engine: &SimulationEngine) {
    println!();
    match outcome {
        EngagementOutcome::Intercepted { time_s } => {
            println!("迎撃成功: {:.2}秒", time_s);
            println!(
                "迎撃地点: ({:.1}, {:.1})m",
                engine.interceptor.position.x, engine.interceptor.position.y
            );
        }
        EngagementOutcome::TimedOut => {
            let separation = engine.target.position.distance(&engine.interceptor.position);
            println!("迎撃失敗: 時間上限 {:.1}秒 までに捕捉できませんでした", engine.t_final);
            println!("最終距離: {:.1}m", separation);
        }
    }
    println!("実行ステップ数: {}", engine.step_count);
}

/// 軌跡CSVの書き出し（出力先指定がある場合のみ）
fn export_trajectory(
    engine: &SimulationEngine,
    csv_path: Option<&String>,
) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(path) = csv_path {
        write_trajectory_csv(path, engine.dt, &engine.target, &engine.interceptor)?;
        println!("軌跡を書き出しました: {}", path);
    }
    Ok(())
}

/// デフォルトヘルプとシナリオ一覧を表示
fn show_default_help() {
    println!("使用方法:");
    println!("  pnsim [オプション]");
    println!();
    println!("オプション:");
    println!("  -s, --scenario <FILE>  シナリオファイルを指定して実行");
    println!("  -i, --info             シナリオ情報のみ表示");
    println!("  -t, --test             組み込みの基準交戦シナリオを実行");
    println!("  -o, --output <FILE>    軌跡をCSVに書き出す");
    println!("  -v, --verbose          詳細出力 (複数指定で詳細レベル上昇)");
    println!("  -h, --help             このヘルプを表示");
    println!();
    println!("利用可能なシナリオファイル:");
    println!("  scenarios/scenario_reference.yaml - 基準交戦（正面交差）");
    println!("  scenarios/scenario_crossing.yaml  - 側方交差シナリオ");
    println!();
    println!("例:");
    println!("  pnsim -t");
    println!("  pnsim -s scenarios/scenario_reference.yaml -v");
    println!("  pnsim -s scenarios/scenario_crossing.yaml -o output/trajectory.csv");
    println!("  pnsim -s scenarios/scenario_reference.yaml -i");
}
