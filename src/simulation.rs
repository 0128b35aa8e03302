//! # Simulation モジュール
//!
//! 追跡・回避交戦シミュレーションの中核となるエンジンを提供します。
//!
//! このモジュールは、固定時間刻み（Δt）による時間駆動シミュレーションの
//! メインループを管理し、ターゲットと迎撃機の2機をロックステップで前進
//! させます。各反復で捕捉判定と時間上限判定を行い、交戦の結末
//! （迎撃成功または時間切れ）を返します。
//!
//! ## シミュレーション処理順序
//!
//! 各時間刻みにおいて、以下の順序で処理が実行されます：
//!
//! 1. **ターゲット更新**: 無誘導の等速直線運動
//! 2. **迎撃機更新**: ターゲットの現在状態を用いた比例航法誘導と積分
//! 3. **捕捉判定**: 2機間距離が捕捉半径以下なら迎撃成功で終了
//! 4. **時間判定**: 時刻を進め、上限を超えたら時間切れで終了
//!
//! 捕捉判定は同一反復内で時間判定より先に行われるため、ちょうど時間
//! 上限で発生した迎撃も成功として扱われます。
//!
//! ## 使用例
//!
//! ```rust
//! use pnsim::simulation::SimulationEngine;
//! use pnsim::scenario::ScenarioConfig;
//!
//! let config = ScenarioConfig::from_file("scenarios/scenario_reference.yaml")?;
//! let mut engine = SimulationEngine::new(&config, 1); // verbose_level=1
//! let outcome = engine.run();
//! ```

use crate::models::{Position2D, Velocity2D, Acceleration2D, Vehicle, Role};
use crate::scenario::ScenarioConfig;
use tracing::{info, warn, debug, trace};

/// 交戦の結末
///
/// 時間切れ（`TimedOut`）はエラーではなく正常な終端状態で、
/// 呼び出し側が迎撃成功と区別できる必要があります。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum EngagementOutcome {
    /// 迎撃成功（捕捉判定時点のシミュレーション時刻）
    Intercepted { time_s: f64 },
    /// 時間上限までに捕捉できず終了
    TimedOut,
}

pub struct SimulationEngine {
    pub current_time: f64,
    pub dt: f64,
    pub t_final: f64,
    pub capture_radius: f64,
    pub step_count: u64,

    pub target: Vehicle,
    pub interceptor: Vehicle,

    pub verbose_level: u8,
}

impl SimulationEngine {
    /// シナリオ設定からエンジンを構築
    pub fn new(scenario: &ScenarioConfig, verbose_level: u8) -> Self {
        let target = Vehicle::new(
            Role::Target,
            Position2D::new(scenario.target.position.x_m, scenario.target.position.y_m),
            Velocity2D::new(scenario.target.velocity.x_mps, scenario.target.velocity.y_mps),
            Acceleration2D::new(
                scenario.target.acceleration.x_mps2,
                scenario.target.acceleration.y_mps2,
            ),
            scenario.guidance.n,
        );

        let interceptor = Vehicle::new(
            Role::Interceptor,
            Position2D::new(
                scenario.interceptor.position.x_m,
                scenario.interceptor.position.y_m,
            ),
            Velocity2D::new(
                scenario.interceptor.velocity.x_mps,
                scenario.interceptor.velocity.y_mps,
            ),
            Acceleration2D::new(
                scenario.interceptor.acceleration.x_mps2,
                scenario.interceptor.acceleration.y_mps2,
            ),
            scenario.guidance.n,
        );

        Self::from_vehicles(
            target,
            interceptor,
            scenario.sim.dt_s,
            scenario.sim.t_final_s,
            scenario.engagement.capture_radius_m,
            verbose_level,
        )
    }

    /// 構築済みの機体からエンジンを組み立てる
    pub fn from_vehicles(
        target: Vehicle,
        interceptor: Vehicle,
        dt: f64,
        t_final: f64,
        capture_radius: f64,
        verbose_level: u8,
    ) -> Self {
        Self {
            current_time: 0.0,
            dt,
            t_final,
            capture_radius,
            step_count: 0,
            target,
            interceptor,
            verbose_level,
        }
    }

    /// 交戦ループの実行
    ///
    /// 両機をロックステップで前進させ、捕捉または時間切れまで反復します。
    /// 1反復ごとに両機の履歴が1件ずつ伸びるため、終了後も2機の履歴は
    /// インデックス整合を保ちます。
    pub fn run(&mut self) -> EngagementOutcome {
        info!("=== 交戦シミュレーション開始 ===");

        if self.verbose_level > 1 {
            debug!(
                dt = self.dt,
                t_final = self.t_final,
                capture_radius = self.capture_radius,
                navigation_gain = self.interceptor.navigation_gain,
                "交戦パラメータ"
            );
        }

        loop {
            // ターゲット（無誘導） → 迎撃機（誘導）の順で更新
            self.target.step(self.dt, None);
            self.interceptor.step(
                self.dt,
                Some((self.target.position, self.target.velocity)),
            );
            self.step_count += 1;

            let separation = self.target.position.distance(&self.interceptor.position);

            if self.verbose_level > 2 {
                trace!(
                    time = self.current_time,
                    step = self.step_count,
                    separation = separation,
                    "ステップ完了"
                );
            }

            if self.step_count % 100 == 0 && self.verbose_level > 0 {
                let progress = (self.current_time / self.t_final) * 100.0;
                info!(
                    "進行状況: {:.1}% ({:.1}/{:.1}秒, 距離: {:.1}m)",
                    progress, self.current_time, self.t_final, separation
                );
            }

            // 捕捉判定は時間判定より先（時間上限ちょうどの迎撃も成功扱い）
            if separation <= self.capture_radius {
                info!(
                    intercept_time_s = self.current_time,
                    step_count = self.step_count,
                    separation_m = separation,
                    intercept_x_m = self.interceptor.position.x,
                    intercept_y_m = self.interceptor.position.y,
                    "ENGAGEMENT_INTERCEPT: 迎撃機がターゲットを捕捉しました"
                );
                return EngagementOutcome::Intercepted { time_s: self.current_time };
            }

            self.current_time += self.dt;
            if self.current_time > self.t_final {
                warn!(
                    t_final_s = self.t_final,
                    step_count = self.step_count,
                    final_separation_m = separation,
                    "ENGAGEMENT_TIMEOUT: 時間上限までに捕捉できませんでした"
                );
                return EngagementOutcome::TimedOut;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_engine() -> SimulationEngine {
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
        SimulationEngine::from_vehicles(target, interceptor, 0.01, 100.0, 0.5, 0)
    }

    /// test_reference_engagement_intercepts
    /// 基準シナリオ（ターゲット (-50, 500) @ (12, 0) m/s、
    /// 迎撃機 (0, 0) @ (0, 10) m/s、N=3、dt=0.01、捕捉半径0.5m、
    /// 上限100秒）は 0 < t < 100 で迎撃成功となります。
    #[test]
    fn test_reference_engagement_intercepts() {
        let mut engine = reference_engine();

        match engine.run() {
            EngagementOutcome::Intercepted { time_s } => {
                assert!(time_s > 0.0);
                assert!(time_s < 100.0);
            }
            EngagementOutcome::TimedOut => panic!("基準シナリオで迎撃に失敗"),
        }

        // 最終距離は捕捉半径以下
        let separation = engine
            .target
            .position
            .distance(&engine.interceptor.position);
        assert!(separation <= 0.5);
    }

    /// test_histories_stay_aligned
    /// 交戦終了後、両機の履歴は同数（実行ステップ数+1）の記録を持ちます。
    #[test]
    fn test_histories_stay_aligned() {
        let mut engine = reference_engine();
        engine.run();

        let expected = engine.step_count as usize + 1;
        assert_eq!(engine.target.history.len(), expected);
        assert_eq!(engine.interceptor.history.len(), expected);
    }

    /// test_capture_wins_over_timeout
    /// 捕捉と時間上限超過が同一反復で発生する場合、捕捉判定が先に
    /// 行われるため結果は Intercepted になります（TimedOutではなく）。
    #[test]
    fn test_capture_wins_over_timeout() {
        // 両機とも静止、初期距離0.3m ≤ 捕捉半径0.5m。
        // dt=1.0, t_final=0.5 なので最初の反復で時間上限も超える。
        let target = Vehicle::new(
            Role::Target,
            Position2D::new(0.3, 0.0),
            Velocity2D::new(0.0, 0.0),
            Acceleration2D::zero(),
            3.0,
        );
        let interceptor = Vehicle::new(
            Role::Interceptor,
            Position2D::new(0.0, 0.0),
            Velocity2D::new(0.0, 0.0),
            Acceleration2D::zero(),
            3.0,
        );
        let mut engine =
            SimulationEngine::from_vehicles(target, interceptor, 1.0, 0.5, 0.5, 0);

        assert_eq!(
            engine.run(),
            EngagementOutcome::Intercepted { time_s: 0.0 }
        );
    }

    /// test_non_convergence_times_out
    /// LOS回転のない尾追いジオメトリ（相対速度がLOSに平行で離反方向）では
    /// 指令加速度が零のまま距離が縮まらず、TimedOutで正常終了します。
    #[test]
    fn test_non_convergence_times_out() {
        let target = Vehicle::new(
            Role::Target,
            Position2D::new(1000.0, 0.0),
            Velocity2D::new(100.0, 0.0),
            Acceleration2D::zero(),
            3.0,
        );
        let interceptor = Vehicle::new(
            Role::Interceptor,
            Position2D::new(0.0, 0.0),
            Velocity2D::new(0.0, 0.0),
            Acceleration2D::zero(),
            3.0,
        );
        let mut engine =
            SimulationEngine::from_vehicles(target, interceptor, 0.1, 1.0, 0.5, 0);

        assert_eq!(engine.run(), EngagementOutcome::TimedOut);

        // 履歴整合は時間切れ時も維持される
        assert_eq!(
            engine.target.history.len(),
            engine.interceptor.history.len()
        );
        assert_eq!(
            engine.target.history.len(),
            engine.step_count as usize + 1
        );
    }
}
