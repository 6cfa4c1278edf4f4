use crate::particles::Particle;
use crate::utils::FreeList;

/// An axis-aligned rectangle with its origin at the top-left corner.
///
/// Containment is half-open: the left and top edges are inclusive, the
/// right and bottom edges exclusive. The four quadrants of a rectangle
/// therefore tile it exactly, so any point inside a branch's rectangle
/// lands in exactly one child.
///
/// # Examples
///
/// ```
/// use quadgrav::quadtree::Rect;
///
/// let rect = Rect { x: 0.0, y: 0.0, w: 10.0, h: 10.0 };
/// assert!(rect.contains(0.0, 0.0));   // origin corner is inclusive
/// assert!(rect.contains(9.9, 5.0));
/// assert!(!rect.contains(10.0, 5.0)); // far edge is exclusive
/// ```
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl Rect {
    pub fn contains(&self, px: f64, py: f64) -> bool {
        px >= self.x && px < self.x + self.w && py >= self.y && py < self.y + self.h
    }

    /// The four child rectangles in arena order: NW, NE, SW, SE
    /// (y grows downward, as in window coordinates).
    pub fn quadrants(&self) -> [Rect; 4] {
        let hw = self.w / 2.0;
        let hh = self.h / 2.0;
        [
            Rect { x: self.x, y: self.y, w: hw, h: hh },
            Rect { x: self.x + hw, y: self.y, w: hw, h: hh },
            Rect { x: self.x, y: self.y + hh, w: hw, h: hh },
            Rect { x: self.x + hw, y: self.y + hh, w: hw, h: hh },
        ]
    }
}

/// One arena slot. `count == -1` marks a branch; `count >= 0` marks a leaf
/// holding that many particles. Children of slot `i` live at
/// `4i+1 ..= 4i+4` for the arena's whole lifetime.
#[derive(Clone, Copy, Debug)]
pub struct TreeNode {
    /// Head of the leaf's element list, -1 if empty.
    pub first_element: i32,
    /// Handle of the leaf's gravity aggregate, -1 for branches and
    /// never-populated leaves.
    pub aggregate: i32,
    /// Member count, or -1 for a branch.
    pub count: i32,
}

impl TreeNode {
    const EMPTY: TreeNode = TreeNode {
        first_element: -1,
        aggregate: -1,
        count: 0,
    };

    pub fn is_branch(&self) -> bool {
        self.count == -1
    }
}

/// Intrusive singly-linked-list cell tying a particle index into a leaf's
/// membership list. The whole vector is bulk-cleared on reset.
#[derive(Clone, Copy, Debug)]
struct ElementNode {
    next: i32,
    particle: u32,
}

/// Mass-weighted position sums for one leaf. The centroid is the sum
/// divided by the total mass, computed on read.
#[derive(Clone, Copy, Debug, Default)]
pub struct GravityAggregate {
    pub com_x: f64,
    pub com_y: f64,
    pub total_mass: f64,
}

impl GravityAggregate {
    fn fold(&mut self, particle: &Particle) {
        self.total_mass += particle.mass;
        self.com_x += particle.position.0 * particle.mass;
        self.com_y += particle.position.1 * particle.mass;
    }

    /// Mass-weighted centroid, or the origin for a zero-mass aggregate.
    pub fn centroid(&self) -> (f64, f64) {
        if self.total_mass > 0.0 {
            (self.com_x / self.total_mass, self.com_y / self.total_mass)
        } else {
            (0.0, 0.0)
        }
    }
}

/// A populated leaf collected by [`QuadTree::leaf_survey`].
#[derive(Clone, Copy, Debug)]
pub struct LeafRef {
    /// Arena index of the leaf node.
    pub node: usize,
    pub bounds: Rect,
}

/// Snapshot of the tree's populated leaves plus the global aggregate,
/// produced once per frame and consumed by the force evaluation phase and
/// the display adapter.
#[derive(Clone, Debug, Default)]
pub struct LeafSurvey {
    pub leaves: Vec<LeafRef>,
    /// Every leaf in the tree, empty ones included (overlay occupancy).
    pub total_leaves: usize,
    pub global_com: (f64, f64),
    pub total_mass: f64,
}

fn total_nodes(max_depth: usize) -> usize {
    (0..=max_depth as u32).map(|i| 4usize.pow(i)).sum()
}

/// A fixed-capacity quadtree over `[0, width) × [0, height)`.
///
/// All storage — the node arena, the element-node list and the aggregate
/// pool — is allocated once at construction and recycled every frame:
/// [`reset`](QuadTree::reset), then [`insert`](QuadTree::insert), then
/// queries. The tree holds no state across frames.
///
/// # Examples
///
/// ```
/// use quadgrav::particles::Particle;
/// use quadgrav::quadtree::QuadTree;
///
/// let mut tree = QuadTree::new(100.0, 100.0, 3, 4);
/// let particles = vec![
///     Particle::new((10.0, 10.0), (0.0, 0.0), 2.0).unwrap(),
///     Particle::new((80.0, 80.0), (0.0, 0.0), 6.0).unwrap(),
/// ];
///
/// tree.reset();
/// tree.insert(&particles);
///
/// let survey = tree.leaf_survey();
/// assert_eq!(survey.total_mass, 8.0);
/// // Two light particles, far apart: still one root leaf.
/// assert_eq!(survey.leaves.len(), 1);
/// ```
pub struct QuadTree {
    width: f64,
    height: f64,
    max_depth: usize,
    node_capacity: usize,
    nodes: Vec<TreeNode>,
    elements: Vec<ElementNode>,
    aggregates: FreeList<GravityAggregate>,
}

impl QuadTree {
    /// Builds the arena for `(width, height, max_depth, capacity)`:
    /// `sum(4^i, i = 0..=max_depth)` node slots, with element storage
    /// pre-sized for a fully split tree.
    pub fn new(width: f64, height: f64, max_depth: usize, node_capacity: usize) -> Self {
        let arena = total_nodes(max_depth);
        Self {
            width,
            height,
            max_depth,
            node_capacity,
            nodes: vec![TreeNode::EMPTY; arena],
            elements: Vec::with_capacity(4usize.pow(max_depth as u32) * node_capacity),
            aggregates: FreeList::with_capacity(arena),
        }
    }

    pub fn bounds(&self) -> Rect {
        Rect { x: 0.0, y: 0.0, w: self.width, h: self.height }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn node_capacity(&self) -> usize {
        self.node_capacity
    }

    /// Number of arena slots (not the number of live leaves).
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn node(&self, index: usize) -> &TreeNode {
        &self.nodes[index]
    }

    /// The aggregate of a populated leaf, `None` for branches and empty
    /// leaves.
    pub fn aggregate(&self, node: usize) -> Option<&GravityAggregate> {
        let handle = self.nodes[node].aggregate;
        if handle == -1 {
            None
        } else {
            Some(&self.aggregates[handle])
        }
    }

    /// Iterates the particle indices linked into a leaf's element list.
    pub fn leaf_members(&self, node: usize) -> LeafMembers<'_> {
        debug_assert!(!self.nodes[node].is_branch(), "member walk on a branch node");
        LeafMembers {
            elements: &self.elements,
            cursor: self.nodes[node].first_element,
        }
    }

    /// Returns every arena slot to the empty-leaf state and releases all
    /// aggregate and element storage in bulk. Must run once per frame
    /// before re-insertion; a stale tree double-counts aggregates.
    pub fn reset(&mut self) {
        for node in &mut self.nodes {
            *node = TreeNode::EMPTY;
        }
        self.elements.clear();
        self.aggregates.clear();
    }

    /// Inserts every particle of the slice, splitting leaves as needed.
    ///
    /// Element nodes record positions within `particles`, so the same
    /// slice (un-reordered) must back any later member lookups this frame.
    /// Particles outside the root rectangle are skipped; callers evict
    /// out-of-bounds particles beforehand.
    pub fn insert(&mut self, particles: &[Particle]) {
        for (index, particle) in particles.iter().enumerate() {
            self.insert_one(index as u32, particle, particles);
        }
    }

    fn insert_one(&mut self, index: u32, particle: &Particle, particles: &[Particle]) {
        let (px, py) = particle.position;
        if !self.bounds().contains(px, py) {
            return;
        }
        let mut stack: Vec<(usize, usize, Rect)> = Vec::with_capacity(self.max_depth + 1);
        stack.push((0, 0, self.bounds()));

        while let Some((idx, depth, bounds)) = stack.pop() {
            let quadrants = bounds.quadrants();
            let node = self.nodes[idx];

            if !node.is_branch() {
                let occupancy = node.count as usize;
                if depth < self.max_depth && occupancy + 1 > self.node_capacity {
                    self.split(idx, &quadrants, particles);
                    // fall through and re-descend into the matching child
                } else {
                    // At max depth the leaf grows without bound instead of
                    // splitting.
                    self.append(idx, index, particle);
                    continue;
                }
            }

            for (j, quadrant) in quadrants.iter().enumerate() {
                if quadrant.contains(px, py) {
                    stack.push((4 * idx + 1 + j, depth + 1, *quadrant));
                    break;
                }
            }
        }
    }

    /// Links `index` to the front of the leaf's element list and folds the
    /// particle into its aggregate, allocating one on first use.
    fn append(&mut self, idx: usize, index: u32, particle: &Particle) {
        debug_assert!(!self.nodes[idx].is_branch());

        self.elements.push(ElementNode {
            next: self.nodes[idx].first_element,
            particle: index,
        });
        let element = (self.elements.len() - 1) as i32;

        let aggregate = if self.nodes[idx].aggregate == -1 {
            let handle = self.aggregates.insert(GravityAggregate::default());
            self.nodes[idx].aggregate = handle;
            handle
        } else {
            self.nodes[idx].aggregate
        };

        let node = &mut self.nodes[idx];
        node.first_element = element;
        node.count += 1;
        self.aggregates[aggregate].fold(particle);
    }

    /// Turns a full leaf into a branch: the parent's aggregate goes back
    /// to the pool and every element node is re-linked into the child
    /// whose rectangle contains its particle. Children allocate their own
    /// aggregates as elements arrive, so a child left empty by the
    /// redistribution stays aggregate-free.
    fn split(&mut self, parent: usize, quadrants: &[Rect; 4], particles: &[Particle]) {
        debug_assert!(!self.nodes[parent].is_branch(), "split on a branch node");
        debug_assert!(4 * parent + 4 < self.nodes.len(), "split past the arena's depth");
        debug_assert!((1..=4).all(|j| self.nodes[4 * parent + j].count == 0));

        let mut element = self.nodes[parent].first_element;
        while element != -1 {
            let next = self.elements[element as usize].next;
            let particle_index = self.elements[element as usize].particle as usize;
            let particle = &particles[particle_index];
            let (px, py) = particle.position;

            for (j, quadrant) in quadrants.iter().enumerate() {
                if quadrant.contains(px, py) {
                    let child = 4 * parent + 1 + j;
                    self.elements[element as usize].next = self.nodes[child].first_element;
                    self.nodes[child].first_element = element;
                    self.nodes[child].count += 1;
                    let aggregate = if self.nodes[child].aggregate == -1 {
                        let handle = self.aggregates.insert(GravityAggregate::default());
                        self.nodes[child].aggregate = handle;
                        handle
                    } else {
                        self.nodes[child].aggregate
                    };
                    self.aggregates[aggregate].fold(particle);
                    break;
                }
            }

            element = next;
        }

        let aggregate = self.nodes[parent].aggregate;
        debug_assert!(aggregate != -1, "splitting a leaf that was never populated");
        self.aggregates.erase(aggregate);

        let node = &mut self.nodes[parent];
        node.aggregate = -1;
        node.first_element = -1;
        node.count = -1;
    }

    /// One explicit-stack depth-first pass collecting every populated leaf
    /// and folding their aggregates into the global center of mass. Empty
    /// leaves are skipped from the list but still counted for overlays.
    pub fn leaf_survey(&self) -> LeafSurvey {
        let mut survey = LeafSurvey::default();
        let mut com = (0.0, 0.0);
        let mut mass = 0.0;

        let mut stack: Vec<(usize, Rect)> = Vec::with_capacity(4 * self.max_depth + 1);
        stack.push((0, self.bounds()));

        while let Some((idx, bounds)) = stack.pop() {
            let node = &self.nodes[idx];
            if !node.is_branch() {
                survey.total_leaves += 1;
                if node.count > 0 {
                    let aggregate = &self.aggregates[node.aggregate];
                    com.0 += aggregate.com_x;
                    com.1 += aggregate.com_y;
                    mass += aggregate.total_mass;
                    survey.leaves.push(LeafRef { node: idx, bounds });
                }
            } else {
                for (j, quadrant) in bounds.quadrants().iter().enumerate() {
                    stack.push((4 * idx + 1 + j, *quadrant));
                }
            }
        }

        if mass > 0.0 {
            survey.global_com = (com.0 / mass, com.1 / mass);
        }
        survey.total_mass = mass;
        survey
    }
}

/// Iterator over the particle indices of one leaf.
pub struct LeafMembers<'a> {
    elements: &'a [ElementNode],
    cursor: i32,
}

impl Iterator for LeafMembers<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.cursor == -1 {
            return None;
        }
        let element = &self.elements[self.cursor as usize];
        self.cursor = element.next;
        Some(element.particle as usize)
    }
}
