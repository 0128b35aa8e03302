use serde::{Deserialize, Serialize};
use std::path::Path;
use std::fs;

/// シナリオメタデータ
#[derive(Debug, Deserialize, Serialize)]
pub struct ScenarioMeta {
    pub version: String,
    pub name: String,
    pub description: String,
}

/// シミュレーション設定
#[derive(Debug, Deserialize, Serialize)]
pub struct SimulationConfig {
    pub dt_s: f64,
    pub t_final_s: f64,
}

/// 交戦判定設定
#[derive(Debug, Deserialize, Serialize)]
pub struct EngagementConfig {
    pub capture_radius_m: f64,
}

/// 誘導則設定
#[derive(Debug, Deserialize, Serialize)]
pub struct GuidanceConfig {
    pub r#type: String, // "type"はRustのキーワードなのでr#でエスケープ
    #[serde(rename = "N")]
    pub n: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Position2DConfig {
    pub x_m: f64,
    pub y_m: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Velocity2DConfig {
    pub x_mps: f64,
    pub y_mps: f64,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Acceleration2DConfig {
    pub x_mps2: f64,
    pub y_mps2: f64,
}

/// 機体1機分の初期状態
#[derive(Debug, Deserialize, Serialize)]
pub struct VehicleConfig {
    pub position: Position2DConfig,
    pub velocity: Velocity2DConfig,
    pub acceleration: Acceleration2DConfig,
}

/// 完全なシナリオ設定
#[derive(Debug, Deserialize, Serialize)]
pub struct ScenarioConfig {
    pub meta: ScenarioMeta,
    pub sim: SimulationConfig,
    pub engagement: EngagementConfig,
    pub guidance: GuidanceConfig,
    pub target: VehicleConfig,
    pub interceptor: VehicleConfig,
}

impl ScenarioConfig {
    /// YAMLファイルからシナリオ設定を読み込み
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ScenarioError> {
        let path = path.as_ref();

        // ファイル存在チェック
        if !path.exists() {
            return Err(ScenarioError::FileNotFound(path.to_path_buf()));
        }

        // ファイル読み込み
        let contents = fs::read_to_string(path)
            .map_err(|e| ScenarioError::IoError(path.to_path_buf(), e))?;

        // YAML解析
        let config: ScenarioConfig = serde_yaml::from_str(&contents)
            .map_err(|e| ScenarioError::ParseError(path.to_path_buf(), e))?;

        // 基本的な検証
        config.validate()?;

        Ok(config)
    }

    /// 設定の基本的な検証
    ///
    /// コア（機体・交戦ループ）はパラメータを検証しないため、
    /// 妥当なパラメータの供給はこのシナリオ層の責務です。
    pub fn validate(&self) -> Result<(), ScenarioError> {
        // 時間設定の検証
        if self.sim.dt_s <= 0.0 {
            return Err(ScenarioError::ValidationError("dt_s must be positive".to_string()));
        }
        if self.sim.t_final_s <= 0.0 {
            return Err(ScenarioError::ValidationError("t_final_s must be positive".to_string()));
        }

        // 交戦判定の検証
        if self.engagement.capture_radius_m <= 0.0 {
            return Err(ScenarioError::ValidationError("capture_radius_m must be positive".to_string()));
        }

        // 誘導則の検証（純粋なPNのみサポート）
        if self.guidance.r#type != "PN" {
            return Err(ScenarioError::ValidationError(
                format!("Unsupported guidance type: {}", self.guidance.r#type)
            ));
        }
        if self.guidance.n <= 0.0 {
            return Err(ScenarioError::ValidationError("guidance N must be positive".to_string()));
        }

        // 初期配置の検証（開始時点で交戦済みのシナリオを弾く）
        let dx = self.target.position.x_m - self.interceptor.position.x_m;
        let dy = self.target.position.y_m - self.interceptor.position.y_m;
        let initial_separation = (dx * dx + dy * dy).sqrt();
        if initial_separation <= self.engagement.capture_radius_m {
            return Err(ScenarioError::ValidationError(
                format!("Initial separation {} <= capture radius {}",
                        initial_separation, self.engagement.capture_radius_m)
            ));
        }

        Ok(())
    }

    /// シナリオの概要を表示
    pub fn print_summary(&self) {
        println!("=== シナリオ情報 ===");
        println!("名前: {}", self.meta.name);
        println!("説明: {}", self.meta.description);
        println!("バージョン: {}", self.meta.version);
        println!();

        println!("=== シミュレーション設定 ===");
        println!("時間刻み: {:.3}秒", self.sim.dt_s);
        println!("時間上限: {:.1}秒", self.sim.t_final_s);
        println!("捕捉半径: {:.2}m", self.engagement.capture_radius_m);
        println!("誘導則: {} (N = {:.1})", self.guidance.r#type, self.guidance.n);
        println!();

        println!("=== 初期状態 ===");
        println!("ターゲット: 位置 ({:.1}, {:.1})m, 速度 ({:.1}, {:.1})m/s",
                 self.target.position.x_m, self.target.position.y_m,
                 self.target.velocity.x_mps, self.target.velocity.y_mps);
        println!("迎撃機:     位置 ({:.1}, {:.1})m, 速度 ({:.1}, {:.1})m/s",
                 self.interceptor.position.x_m, self.interceptor.position.y_m,
                 self.interceptor.velocity.x_mps, self.interceptor.velocity.y_mps);
    }
}

/// シナリオ読み込みエラー
#[derive(Debug)]
pub enum ScenarioError {
    FileNotFound(std::path::PathBuf),
    IoError(std::path::PathBuf, std::io::Error),
    ParseError(std::path::PathBuf, serde_yaml::Error),
    ValidationError(String),
}

impl std::fmt::Display for ScenarioError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScenarioError::FileNotFound(path) => {
                write!(f, "シナリオファイルが見つかりません: {}", path.display())
            }
            ScenarioError::IoError(path, err) => {
                write!(f, "ファイル読み込みエラー {}: {}", path.display(), err)
            }
            ScenarioError::ParseError(path, err) => {
                write!(f, "YAML解析エラー {}: {}", path.display(), err)
            }
            ScenarioError::ValidationError(msg) => {
                write!(f, "設定検証エラー: {}", msg)
            }
        }
    }
}

impl std::error::Error for ScenarioError {}
