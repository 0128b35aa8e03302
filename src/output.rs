//! 軌跡の記録出力
//!
//! 交戦終了後に両機の全状態履歴（位置・速度・加速度）をCSVとして
//! 書き出します。履歴の各インデックスが1行に対応し、行数は
//! 実行ステップ数+1（初期状態を含む）になります。可視化・解析は
//! このファイルを読み込む外部ツールの責務です。

use std::error::Error;
use std::fs::File;
use std::io::{BufWriter, Write};

use crate::models::Vehicle;

/// CSV出力の設定とヘッダー・全行の書き込み
pub fn write_trajectory_csv(
    path: &str,
    dt: f64,
    target: &Vehicle,
    interceptor: &Vehicle,
) -> Result<(), Box<dyn Error>> {
    let output_file = File::create(path)?;
    let mut writer = BufWriter::new(output_file);

    write_csv_header(&mut writer)?;

    // 両機の履歴は交戦ループによりインデックス整合が保たれている
    let rows = target.history.len().min(interceptor.history.len());
    for index in 0..rows {
        let row = create_csv_row(index, dt, target, interceptor);
        writer.write_all(row.as_bytes())?;
    }

    writer.flush()?;
    Ok(())
}

/// CSVヘッダーの書き込み
pub fn write_csv_header<W: Write>(writer: &mut W) -> Result<(), std::io::Error> {
    let mut header = String::from("time(s),");

    for label in ["target", "interceptor"] {
        header.push_str(&format!(
            "{0}_x(m),{0}_y(m),{0}_vx(mps),{0}_vy(mps),{0}_ax(mps2),{0}_ay(mps2),",
            label
        ));
    }

    header.push('\n');
    writer.write_all(header.as_bytes())?;
    Ok(())
}

/// CSV行の作成
///
/// 履歴インデックスから1行分の文字列を組み立てます。時刻は
/// インデックス×dt（インデックス0が初期状態）です。
pub fn create_csv_row(index: usize, dt: f64, target: &Vehicle, interceptor: &Vehicle) -> String {
    let time = index as f64 * dt;
    let mut row = format!("{},", time);

    for vehicle in [target, interceptor] {
        let position = vehicle.history.position[index];
        let velocity = vehicle.history.velocity[index];
        let acceleration = vehicle.history.acceleration[index];
        row.push_str(&format!(
            "{},{},{},{},{},{},",
            position.x, position.y, velocity.x, velocity.y, acceleration.x, acceleration.y
        ));
    }

    row.push('\n');
    row
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Position2D, Velocity2D, Acceleration2D, Role};

    fn sample_vehicle(role: Role, x: f64) -> Vehicle {
        let mut vehicle = Vehicle::new(
            role,
            Position2D::new(x, 0.0),
            Velocity2D::new(1.0, 0.0),
            Acceleration2D::zero(),
            3.0,
        );
        vehicle.step(0.5, None);
        vehicle
    }

    #[test]
    fn test_csv_header_columns() {
        let mut buffer = Vec::new();
        write_csv_header(&mut buffer).unwrap();
        let header = String::from_utf8(buffer).unwrap();

        assert!(header.starts_with("time(s),"));
        assert!(header.contains("target_x(m)"));
        assert!(header.contains("interceptor_ay(mps2)"));
        assert!(header.ends_with('\n'));
    }

    #[test]
    fn test_csv_row_contents() {
        let target = sample_vehicle(Role::Target, 10.0);
        let interceptor = sample_vehicle(Role::Target, 0.0);

        // インデックス0は初期状態、時刻0
        let row = create_csv_row(0, 0.5, &target, &interceptor);
        assert!(row.starts_with("0,10,0,1,0,0,0,"));

        // インデックス1は1ステップ後、時刻 1×dt
        let row = create_csv_row(1, 0.5, &target, &interceptor);
        assert!(row.starts_with("0.5,10.5,0,1,0,0,0,"));
        assert!(row.ends_with('\n'));
    }

    #[test]
    fn test_trajectory_csv_row_count() {
        let target = sample_vehicle(Role::Target, 10.0);
        let interceptor = sample_vehicle(Role::Target, 0.0);

        let path = std::env::temp_dir().join("pnsim_test_trajectory.csv");
        let path = path.to_str().unwrap();
        write_trajectory_csv(path, 0.5, &target, &interceptor).unwrap();

        let contents = std::fs::read_to_string(path).unwrap();
        // ヘッダー1行 + 履歴2件（初期状態+1ステップ）
        assert_eq!(contents.lines().count(), 3);
    }
}
