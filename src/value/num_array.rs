//! Числовой многомерный массив.
//!
//! Переносимая замена массивов из внешних числовых библиотек: плоский
//! буфер `f64` плюс форма (размеры по осям) в row-major порядке.
//! В JSON массив кодируется вложенными списками, форма восстанавливается
//! из глубины вложенности при декодировании.

use std::cmp::Ordering;

use ordered_float::OrderedFloat;

/// Числовой n-мерный массив: форма + плоские данные.
#[derive(Debug, Clone)]
pub struct NumArray {
    shape: Vec<usize>,
    data: Vec<f64>,
}

impl NumArray {
    /// Создаёт массив заданной формы. Возвращает `None`, если
    /// произведение размеров по осям не совпадает с длиной данных.
    pub fn new(shape: Vec<usize>, data: Vec<f64>) -> Option<Self> {
        let expected: usize = shape.iter().product();
        if expected != data.len() {
            return None;
        }
        Some(Self { shape, data })
    }

    /// Создаёт одномерный массив.
    pub fn from_vec(data: Vec<f64>) -> Self {
        Self {
            shape: vec![data.len()],
            data,
        }
    }

    /// Размеры по осям.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Плоские данные в row-major порядке.
    pub fn data(&self) -> &[f64] {
        &self.data
    }

    /// Общее число элементов.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

// Сравнение через OrderedFloat, чтобы массивы могли жить внутри
// Value с тотальным порядком.
impl PartialEq for NumArray {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for NumArray {}

impl PartialOrd for NumArray {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for NumArray {
    fn cmp(&self, other: &Self) -> Ordering {
        self.shape.cmp(&other.shape).then_with(|| {
            self.data
                .iter()
                .map(|f| OrderedFloat(*f))
                .cmp(other.data.iter().map(|f| OrderedFloat(*f)))
        })
    }
}
