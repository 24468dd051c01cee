use crate::all::BVar;

pub struct HeurParams {
    pub var_inc: f64,
    pub var_decay: f64,
}
impl Default for HeurParams {
    fn default() -> Self {
        HeurParams {
            var_inc: 1_f64,
            var_decay: 0.95_f64,
        }
    }
}

/// Activity-based variable selection (VSIDS).
///
/// Variables are kept in a binary max-heap ordered by activity. `positions[v]` is the place of `v`
/// in the heap, or `None` if the variable is not enqueued (typically because it is assigned).
pub struct Heur {
    params: HeurParams,
    activity: Vec<f64>,
    heap: Vec<BVar>,
    positions: Vec<Option<usize>>,
}

fn above(i: usize) -> usize {
    debug_assert!(i > 0);
    (i - 1) >> 1
}
fn below_left(i: usize) -> usize {
    (i << 1) + 1
}

impl Heur {
    pub fn new(params: HeurParams) -> Self {
        Heur {
            params,
            // index 0 is never used
            activity: vec![0_f64],
            heap: Vec::new(),
            positions: vec![None],
        }
    }

    pub fn record_new_var(&mut self, v: BVar) {
        assert_eq!(v.index(), self.activity.len(), "This is not the next var that should be recorded.");
        self.activity.push(0_f64);
        self.positions.push(None);
        self.var_insert(v);
    }

    pub fn num_enqueued(&self) -> usize {
        self.heap.len()
    }

    pub fn activity(&self, v: BVar) -> f64 {
        self.activity[v.index()]
    }

    pub fn pop_next_var(&mut self) -> Option<BVar> {
        let first = *self.heap.first()?;
        let last = self.heap.pop()?;
        self.positions[first.index()] = None;
        if !self.heap.is_empty() {
            self.heap[0] = last;
            self.positions[last.index()] = Some(0);
            self.sift_down(0);
        }
        Some(first)
    }

    pub fn var_insert(&mut self, var: BVar) {
        if self.positions[var.index()].is_some() {
            return;
        }
        self.heap.push(var);
        let place = self.heap.len() - 1;
        self.positions[var.index()] = Some(place);
        self.sift_up(place);
    }

    pub fn var_bump_activity(&mut self, var: BVar) {
        self.activity[var.index()] += self.params.var_inc;
        if self.activity[var.index()] > 1e100_f64 {
            self.var_rescale_activity()
        }
        if let Some(place) = self.positions[var.index()] {
            self.sift_up(place);
        }
    }

    pub fn decay_activities(&mut self) {
        self.params.var_inc /= self.params.var_decay;
    }

    fn var_rescale_activity(&mut self) {
        // scaling by the same amount cannot change the relative order in the heap
        self.activity.iter_mut().for_each(|a| *a *= 1e-100_f64);
        self.params.var_inc *= 1e-100_f64;
    }

    fn prio(&self, place: usize) -> f64 {
        self.activity[self.heap[place].index()]
    }

    fn swap(&mut self, i: usize, j: usize) {
        self.heap.swap(i, j);
        self.positions[self.heap[i].index()] = Some(i);
        self.positions[self.heap[j].index()] = Some(j);
    }

    fn sift_up(&mut self, mut place: usize) {
        while place > 0 {
            let parent = above(place);
            if self.prio(place) > self.prio(parent) {
                self.swap(place, parent);
                place = parent;
            } else {
                break;
            }
        }
    }

    fn sift_down(&mut self, mut place: usize) {
        let len = self.heap.len();
        loop {
            let left = below_left(place);
            if left >= len {
                return;
            }
            // select the child with the greatest priority
            let child = if left + 1 < len && self.prio(left + 1) > self.prio(left) {
                left + 1
            } else {
                left
            };
            if self.prio(place) >= self.prio(child) {
                return;
            }
            self.swap(place, child);
            place = child;
        }
    }
}
