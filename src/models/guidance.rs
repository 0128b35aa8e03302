//! 比例航法誘導則（Proportional Navigation）
//!
//! 相対幾何（相対位置・相対速度）から迎撃機への指令加速度を計算します。
//! LOS（Line-of-Sight）角速度ベクトルを外積で求めるため、計算の内部では
//! 2次元ベクトルを第3成分ゼロの3成分表現に持ち上げますが、これは外積を
//! 定義するための実装上の都合であり、モジュール外には漏らしません。

use crate::models::common::{Position2D, Velocity2D, Acceleration2D};

/// 2次元ベクトルを第3成分ゼロの3成分配列に持ち上げる
fn lift(x: f64, y: f64) -> [f64; 3] {
    [x, y, 0.0]
}

/// 3成分ベクトルの外積
fn cross3(a: &[f64; 3], b: &[f64; 3]) -> [f64; 3] {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// 3成分ベクトルの内積
fn dot3(a: &[f64; 3], b: &[f64; 3]) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

/// 比例航法による指令加速度の計算
///
/// LOS角速度ベクトル Ω = (r × vr) / (r・r) を求め、
/// 指令加速度 a = N・(vr × Ω) を返します（True PN）。
/// 計算は全て通常の倍精度浮動小数点で行い、正規化・飽和・
/// 加速度制限は一切適用しません。距離が縮まるほど指令加速度が
/// 増大するのは理想PNの性質そのものです。
///
/// # 引数
///
/// * `relative_position` - 迎撃機からターゲットへの相対位置 r（m）
/// * `relative_velocity` - 相対速度 vr（m/s）
/// * `navigation_gain` - 航法定数 N（通常3〜5）
///
/// # 戻り値
///
/// 迎撃機への指令加速度（m/s²）
///
/// # 前提条件
///
/// `relative_position` は零ベクトルでないこと。零ベクトル（衝突
/// ジオメトリ）ではゼロ除算となり、結果は未定義です。ここでは
/// ガードせず、呼び出し側の前提条件として扱います。
pub fn pn_guidance(
    relative_position: Position2D,
    relative_velocity: Velocity2D,
    navigation_gain: f64,
) -> Acceleration2D {
    let r = lift(relative_position.x, relative_position.y);
    let vr = lift(relative_velocity.x, relative_velocity.y);

    // LOS角速度ベクトル Ω = (r × vr) / (r・r)
    let rotation = cross3(&r, &vr);
    let r_dot_r = dot3(&r, &r);
    let omega = [
        rotation[0] / r_dot_r,
        rotation[1] / r_dot_r,
        rotation[2] / r_dot_r,
    ];

    // 指令加速度 a = N・(vr × Ω)
    let command = cross3(&vr, &omega);

    // 第3成分を落として2次元に射影（平面問題なので常にゼロ）
    Acceleration2D::new(
        navigation_gain * command[0],
        navigation_gain * command[1],
    )
}
