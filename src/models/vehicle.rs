use crate::models::{
    common::{Position2D, Velocity2D, Acceleration2D},
    guidance::pn_guidance,
};

/// 機体の役割
///
/// 誘導の有無を選択する2値のタグです。Interceptorのみが誘導則を適用し、
/// それ以外は無誘導（等速直線運動）として積分されます。
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Role {
    /// ターゲット（無誘導・弾道飛行）
    Target,
    /// 迎撃機（比例航法誘導）
    Interceptor,
}

/// 機体の状態履歴
///
/// 位置・速度・加速度の3系列を生成時から追記専用で記録します。
/// 3系列は常に同じ長さ（インデックス整合）を保ち、切り詰めや
/// 並び替えは行いません。
#[derive(Debug, Clone)]
pub struct StateHistory {
    pub position: Vec<Position2D>,
    pub velocity: Vec<Velocity2D>,
    pub acceleration: Vec<Acceleration2D>,
}

impl StateHistory {
    /// 初期状態1件で履歴を開始
    pub fn new(
        position: Position2D,
        velocity: Velocity2D,
        acceleration: Acceleration2D,
    ) -> Self {
        Self {
            position: vec![position],
            velocity: vec![velocity],
            acceleration: vec![acceleration],
        }
    }

    /// 更新後の状態を3系列に追記
    pub fn push(
        &mut self,
        position: Position2D,
        velocity: Velocity2D,
        acceleration: Acceleration2D,
    ) {
        self.position.push(position);
        self.velocity.push(velocity);
        self.acceleration.push(acceleration);
    }

    /// 記録済み状態数（初期状態を含む）
    pub fn len(&self) -> usize {
        self.position.len()
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_empty()
    }
}

/// 質点機体
///
/// ターゲットまたは迎撃機1機の運動状態と、その全履歴を保持します。
/// 生成後の状態変更は `step` のみが行い、シミュレーション終了後に
/// 履歴を読み出して報告・出力に使います。
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub role: Role,
    pub position: Position2D,
    pub velocity: Velocity2D,
    pub acceleration: Acceleration2D,
    /// 航法定数 N（機体生成時に固定、通常3.0）
    pub navigation_gain: f64,
    pub history: StateHistory,
}

impl Vehicle {
    /// 新しい機体を作成します
    ///
    /// 履歴は与えられた初期状態1件で開始されます。
    ///
    /// # 引数
    ///
    /// * `role` - 機体の役割（誘導の有無を決定）
    /// * `position` - 初期位置（m）
    /// * `velocity` - 初期速度（m/s）
    /// * `acceleration` - 初期加速度（m/s²）
    /// * `navigation_gain` - 航法定数 N
    pub fn new(
        role: Role,
        position: Position2D,
        velocity: Velocity2D,
        acceleration: Acceleration2D,
        navigation_gain: f64,
    ) -> Self {
        Self {
            role,
            position,
            velocity,
            acceleration,
            navigation_gain,
            history: StateHistory::new(position, velocity, acceleration),
        }
    }

    /// 1ステップ分の状態更新
    ///
    /// 手順: 1. 誘導計算（迎撃機のみ） → 2. 速度積分 → 3. 位置更新 → 4. 履歴追記
    ///
    /// 積分はセミインプリシット（シンプレクティック）オイラー法で、
    /// 必ず速度→位置の順に更新します。加速度が同一ステップ内の変位に
    /// 反映されるこの順序は、軌道の再現性のため厳密に保存します。
    ///
    /// # 引数
    ///
    /// * `dt` - 時間刻み（秒）
    /// * `pursuit` - 追跡対象の現在の位置と速度。迎撃機では必須で、
    ///   それ以外の役割では無視されます。迎撃機に与えられなかった
    ///   場合、そのステップは無誘導として積分されます。
    pub fn step(&mut self, dt: f64, pursuit: Option<(Position2D, Velocity2D)>) {
        match (self.role, pursuit) {
            (Role::Interceptor, Some((target_position, target_velocity))) => {
                // 相対幾何から指令加速度を計算
                let relative_position = target_position - self.position;
                let relative_velocity = target_velocity - self.velocity;
                self.acceleration =
                    pn_guidance(relative_position, relative_velocity, self.navigation_gain);
            }
            _ => {
                // 無誘導（等速直線運動）
                self.acceleration = Acceleration2D::zero();
            }
        }

        // 速度積分 → 位置更新（順序厳守）
        self.velocity = self.velocity + self.acceleration * dt;
        self.position = self.position + Position2D::new(
            self.velocity.x * dt,
            self.velocity.y * dt,
        );

        self.history.push(self.position, self.velocity, self.acceleration);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference_interceptor() -> Vehicle {
        Vehicle::new(
            Role::Interceptor,
            Position2D::new(0.0, 0.0),
            Velocity2D::new(0.0, 0.0),
            Acceleration2D::zero(),
            3.0,
        )
    }

    /// test_integration_order_velocity_then_position
    /// r = (10, 0), vr = (0, -5), N = 3 で指令加速度は (7.5, 0)。
    /// dt = 0.1 のセミインプリシットオイラーでは
    /// v_new = (0.75, 0)、p_new = (0.075, 0) となります
    /// （位置更新が先なら p_new = (0, 0) になるため順序を判別できます）。
    #[test]
    fn test_integration_order_velocity_then_position() {
        let mut interceptor = reference_interceptor();

        interceptor.step(
            0.1,
            Some((Position2D::new(10.0, 0.0), Velocity2D::new(0.0, -5.0))),
        );

        assert!((interceptor.acceleration.x - 7.5).abs() < 1e-12);
        assert!((interceptor.velocity.x - 0.75).abs() < 1e-12);
        assert!((interceptor.position.x - 0.075).abs() < 1e-12);
        assert!(interceptor.position.y.abs() < 1e-12);
    }

    /// test_history_growth
    /// k ステップ後の履歴長は初期状態を含めて k+1 で、
    /// 末尾の記録は常に現在状態と一致します。
    #[test]
    fn test_history_growth() {
        let mut target = Vehicle::new(
            Role::Target,
            Position2D::new(-50.0, 500.0),
            Velocity2D::new(12.0, 0.0),
            Acceleration2D::zero(),
            3.0,
        );

        let steps = 5;
        for _ in 0..steps {
            target.step(0.01, None);
        }

        assert_eq!(target.history.len(), steps + 1);
        assert_eq!(target.history.position.len(), target.history.velocity.len());
        assert_eq!(target.history.velocity.len(), target.history.acceleration.len());

        assert_eq!(*target.history.position.last().unwrap(), target.position);
        assert_eq!(*target.history.velocity.last().unwrap(), target.velocity);
        assert_eq!(
            *target.history.acceleration.last().unwrap(),
            target.acceleration
        );
    }

    /// test_unguided_vehicle_zero_acceleration
    /// ターゲット役の機体は、初期加速度が非零でも毎ステップ後に
    /// 加速度 (0, 0) となり、速度は変化しません。
    #[test]
    fn test_unguided_vehicle_zero_acceleration() {
        let mut target = Vehicle::new(
            Role::Target,
            Position2D::new(0.0, 100.0),
            Velocity2D::new(12.0, 0.0),
            Acceleration2D::new(5.0, -5.0),
            3.0,
        );

        for _ in 0..3 {
            // 追跡情報を渡しても無視される
            target.step(
                0.1,
                Some((Position2D::new(1.0, 1.0), Velocity2D::new(1.0, 1.0))),
            );

            assert_eq!(target.acceleration, Acceleration2D::zero());
            assert!((target.velocity.x - 12.0).abs() < 1e-12);
            assert!(target.velocity.y.abs() < 1e-12);
        }
    }

    /// test_initial_state_seeds_history
    /// 生成直後の履歴は初期状態1件のみを含みます。
    #[test]
    fn test_initial_state_seeds_history() {
        let interceptor = reference_interceptor();

        assert_eq!(interceptor.history.len(), 1);
        assert_eq!(interceptor.history.position[0], interceptor.position);
        assert_eq!(interceptor.history.velocity[0], interceptor.velocity);
        assert_eq!(interceptor.history.acceleration[0], interceptor.acceleration);
    }
}
