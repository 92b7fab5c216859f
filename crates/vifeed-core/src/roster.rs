//! Synthetic student roster generation.
//!
//! Names are composed from three independent part lists (family, middle,
//! given). [`generate_names`] keeps drawing until it has the requested number
//! of distinct names and never gives up, so `n` must stay well below the
//! combinatorial space of the lists.

use std::collections::HashSet;

use rand::{Rng, seq::SliceRandom};

/// Default number of students seeded into a fresh store.
pub const DEFAULT_STUDENT_TOTAL: usize = 200;

pub const FAMILY_NAMES: [&str; 20] = [
  "Nguyễn", "Trần", "Lê", "Phạm", "Hoàng", "Huỳnh", "Phan", "Vũ", "Võ", "Đặng",
  "Bùi", "Đỗ", "Hồ", "Ngô", "Dương", "Lý", "Đinh", "Trương", "Hà", "Vương",
];

/// The empty entry produces two-part names.
pub const MIDDLE_NAMES: [&str; 20] = [
  "Văn", "Thị", "Hữu", "Ngọc", "Quang", "Minh", "Tuấn", "Thanh", "Thị Thu",
  "Thái", "Gia", "Xuân", "Trung", "Đức", "Thành", "Hồng", "Thị Hồng", "Phương",
  "Khánh", "",
];

pub const GIVEN_NAMES: [&str; 40] = [
  "Anh", "Bình", "Châu", "Dũng", "Dung", "Hoa", "Hòa", "Hoàng", "Huy", "Hùng",
  "Kiên", "Lan", "Linh", "Long", "Mai", "Minh", "Nam", "Ngân", "Ngọc", "Nhung",
  "Phúc", "Phương", "Quân", "Quang", "Sơn", "Thảo", "Thành", "Thu", "Thủy",
  "Trang", "Triệu", "Trinh", "Trung", "Tuấn", "Tùng", "Việt", "Vy", "Yến",
  "Bảo", "Cường",
];

/// Number of distinct full names the part lists can form.
pub const NAME_SPACE: usize = FAMILY_NAMES.len() * MIDDLE_NAMES.len() * GIVEN_NAMES.len();

/// Largest roster [`generate_names`] is asked for. Draws are rejection
/// sampled, so the cap stays at half the name space.
pub const MAX_STUDENT_TOTAL: usize = NAME_SPACE / 2;

/// A student row prior to insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StudentSeed {
  pub student_code: String,
  pub name:         String,
  pub class_id:     i64,
}

/// Draw `n` pairwise-distinct full names, in draw order.
pub fn generate_names<R: Rng + ?Sized>(n: usize, rng: &mut R) -> Vec<String> {
  let mut seen = HashSet::with_capacity(n);
  let mut names = Vec::with_capacity(n);

  while names.len() < n {
    let family = FAMILY_NAMES.choose(rng).copied().unwrap_or_default();
    let middle = MIDDLE_NAMES.choose(rng).copied().unwrap_or_default();
    let given = GIVEN_NAMES.choose(rng).copied().unwrap_or_default();

    let name = if middle.is_empty() {
      format!("{family} {given}")
    } else {
      format!("{family} {middle} {given}")
    };

    if seen.insert(name.clone()) {
      names.push(name);
    }
  }

  names
}

/// Split `total` across `classes` buckets. Every bucket gets
/// `total / classes`; the first `total % classes` get one more.
///
/// Returns an empty vector when there are no classes.
pub fn distribute(total: usize, classes: usize) -> Vec<usize> {
  if classes == 0 {
    return Vec::new();
  }
  let base = total / classes;
  let remainder = total % classes;
  (0..classes)
    .map(|idx| base + usize::from(idx < remainder))
    .collect()
}

/// `SV` + class name + 1-based, zero-padded index, e.g. `SVK47A001`.
pub fn student_code(class_name: &str, index: usize) -> String {
  format!("SV{class_name}{:03}", index + 1)
}

/// Lay out `total` students over `classes` (`(id, name)` pairs, in seeding
/// order).
pub fn plan_students<R: Rng + ?Sized>(
  classes: &[(i64, String)],
  total: usize,
  rng: &mut R,
) -> Vec<StudentSeed> {
  let counts = distribute(total, classes.len());
  if counts.is_empty() {
    return Vec::new();
  }

  let mut names = generate_names(total, rng).into_iter();
  let mut students = Vec::with_capacity(total);

  for ((class_id, class_name), count) in classes.iter().zip(counts) {
    for idx in 0..count {
      let Some(name) = names.next() else { break };
      students.push(StudentSeed {
        student_code: student_code(class_name, idx),
        name,
        class_id: *class_id,
      });
    }
  }

  students
}

#[cfg(test)]
mod tests {
  use rand::{SeedableRng, rngs::StdRng};

  use super::*;

  #[test]
  fn roster_cap_is_half_the_name_space() {
    assert_eq!(NAME_SPACE, 16_000);
    assert_eq!(MAX_STUDENT_TOTAL, 8_000);
    assert!(DEFAULT_STUDENT_TOTAL <= MAX_STUDENT_TOTAL);
  }

  #[test]
  fn names_are_unique() {
    let mut rng = StdRng::seed_from_u64(7);
    let names = generate_names(50, &mut rng);
    assert_eq!(names.len(), 50);
    let unique: HashSet<_> = names.iter().collect();
    assert_eq!(unique.len(), 50);
  }

  #[test]
  fn names_use_two_or_three_parts() {
    let mut rng = StdRng::seed_from_u64(11);
    for name in generate_names(200, &mut rng) {
      let family = name.split(' ').next().unwrap();
      assert!(FAMILY_NAMES.contains(&family), "{name}");
      assert!(name.split(' ').count() >= 2, "{name}");
    }
  }

  #[test]
  fn distribute_preserves_total() {
    for classes in 1..=13 {
      let counts = distribute(200, classes);
      assert_eq!(counts.len(), classes);
      assert_eq!(counts.iter().sum::<usize>(), 200);
      let max = counts.iter().max().unwrap();
      let min = counts.iter().min().unwrap();
      assert!(max - min <= 1, "classes={classes} counts={counts:?}");
    }
  }

  #[test]
  fn distribute_front_loads_remainder() {
    assert_eq!(distribute(10, 3), vec![4, 3, 3]);
    assert_eq!(distribute(2, 4), vec![1, 1, 0, 0]);
  }

  #[test]
  fn distribute_with_no_classes_is_empty() {
    assert!(distribute(200, 0).is_empty());
  }

  #[test]
  fn student_codes_are_one_based() {
    assert_eq!(student_code("K47A", 0), "SVK47A001");
    assert_eq!(student_code("K44B", 19), "SVK44B020");
  }

  #[test]
  fn plan_covers_every_class() {
    let classes: Vec<(i64, String)> = vec![
      (1, "K44A".into()),
      (2, "K44B".into()),
      (3, "K45A".into()),
    ];
    let mut rng = StdRng::seed_from_u64(3);
    let plan = plan_students(&classes, 10, &mut rng);

    assert_eq!(plan.len(), 10);
    assert_eq!(plan.iter().filter(|s| s.class_id == 1).count(), 4);
    assert_eq!(plan.iter().filter(|s| s.class_id == 3).count(), 3);
    assert_eq!(plan[0].student_code, "SVK44A001");
    assert_eq!(plan[4].student_code, "SVK44B001");

    let codes: HashSet<_> = plan.iter().map(|s| &s.student_code).collect();
    assert_eq!(codes.len(), 10);
  }
}
