//! 可设种子的三维 Perlin 噪声

/// 排列表大小
const TABLE_SIZE: usize = 256;

/// Perlin 梯度噪声
///
/// 256 项排列表由 xorshift64 打乱后复制一份，索引无需取模。
#[derive(Debug, Clone)]
pub struct PerlinNoise {
    seed: u64,
    permutation: Box<[u8; TABLE_SIZE * 2]>,
}

struct XorShift64(u64);

impl XorShift64 {
    fn new(seed: u64) -> Self {
        // 全零状态会卡死
        Self(if seed == 0 { 0x9E37_79B9_7F4A_7C15 } else { seed })
    }

    fn next(&mut self) -> u64 {
        let mut x = self.0;
        x ^= x << 13;
        x ^= x >> 7;
        x ^= x << 17;
        self.0 = x;
        x
    }
}

impl PerlinNoise {
    pub fn new(seed: u64) -> Self {
        let mut table = [0u8; TABLE_SIZE];
        for (i, slot) in table.iter_mut().enumerate() {
            *slot = i as u8;
        }
        let mut rng = XorShift64::new(seed);
        for i in (1..TABLE_SIZE).rev() {
            let j = (rng.next() % (i as u64 + 1)) as usize;
            table.swap(i, j);
        }

        let mut permutation = Box::new([0u8; TABLE_SIZE * 2]);
        for (i, slot) in permutation.iter_mut().enumerate() {
            *slot = table[i % TABLE_SIZE];
        }
        Self { seed, permutation }
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// 单层噪声，值域约为 `[-1, 1]`，整数格点处为 0
    pub fn noise3(&self, x: f64, y: f64, z: f64) -> f64 {
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let zi = (z.floor() as i64 & 255) as usize;
        let x = x - x.floor();
        let y = y - y.floor();
        let z = z - z.floor();
        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        let p = &self.permutation;
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
                lerp(u, grad(p[ab], x, y - 1.0, z), grad(p[bb], x - 1.0, y - 1.0, z)),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        )
    }

    /// 分形布朗运动：多层叠加并按总振幅归一化
    ///
    /// 层数钳制到 `[1, 8]`。
    pub fn fbm(
        &self,
        x: f64,
        y: f64,
        z: f64,
        octaves: u32,
        persistence: f64,
        lacunarity: f64,
    ) -> f64 {
        let mut total = 0.0;
        let mut amplitude = 1.0;
        let mut frequency = 1.0;
        let mut max_amplitude = 0.0;
        for _ in 0..octaves.clamp(1, 8) {
            total += self.noise3(x * frequency, y * frequency, z * frequency) * amplitude;
            max_amplitude += amplitude;
            amplitude *= persistence;
            frequency *= lacunarity;
        }
        if max_amplitude > 0.0 {
            total / max_amplitude
        } else {
            0.0
        }
    }
}

#[inline]
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

#[inline]
fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

#[inline]
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    (if h & 1 == 0 { u } else { -u }) + (if h & 2 == 0 { v } else { -v })
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_zero_at_lattice_points() {
        let noise = PerlinNoise::new(42);
        for i in -3..3 {
            assert_eq!(noise.noise3(i as f64, 2.0, -1.0), 0.0);
        }
    }

    #[test]
    fn test_same_seed_is_deterministic() {
        let a = PerlinNoise::new(7);
        let b = PerlinNoise::new(7);
        assert_eq!(a.noise3(1.3, 4.7, 0.2), b.noise3(1.3, 4.7, 0.2));
    }

    #[test]
    fn test_different_seeds_differ() {
        let a = PerlinNoise::new(1);
        let b = PerlinNoise::new(2);
        let differs = (0..20).any(|i| {
            let x = i as f64 * 0.37 + 0.1;
            a.noise3(x, 0.5, 0.5) != b.noise3(x, 0.5, 0.5)
        });
        assert!(differs);
    }

    #[test]
    fn test_zero_seed_is_usable() {
        let noise = PerlinNoise::new(0);
        assert!(noise.noise3(0.5, 0.5, 0.5).is_finite());
    }

    proptest! {
        #[test]
        fn test_fbm_is_bounded(
            x in -1000.0f64..1000.0,
            y in -1000.0f64..1000.0,
            z in 0.0f64..100.0,
            octaves in 0u32..12,
        ) {
            let noise = PerlinNoise::new(99);
            let value = noise.fbm(x, y, z, octaves, 0.5, 2.0);
            prop_assert!(value.is_finite());
            prop_assert!(value.abs() <= 1.1);
        }
    }
}
